//! Shared configuration loader for the contract markdown toolchain.
//!
//! `defaults/contract.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`ContractConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use contract_editor::EditorOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/contract.default.toml");

/// Top-level configuration consumed by contract applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    pub editing: EditingConfig,
}

/// Mirrors the knobs exposed by the editing controller.
#[derive(Debug, Clone, Deserialize)]
pub struct EditingConfig {
    pub lock_text: bool,
    pub default_clause_locked: bool,
}

impl From<EditingConfig> for EditorOptions {
    fn from(config: EditingConfig) -> Self {
        EditorOptions {
            lock_text: config.lock_text,
            default_clause_locked: config.default_clause_locked,
        }
    }
}

impl From<&EditingConfig> for EditorOptions {
    fn from(config: &EditingConfig) -> Self {
        EditorOptions {
            lock_text: config.lock_text,
            default_clause_locked: config.default_clause_locked,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ContractConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ContractConfig, ConfigError> {
    Loader::new().build()
}
