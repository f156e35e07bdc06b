//! Error types for parse and edit operations

use std::fmt;

/// Why an edit intent was refused.
///
/// A refusal is not a document error: the tree is left untouched and the
/// caller is expected to surface the refusal as a no-op, not a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The target range intersects a locked region
    Locked,
    /// A selection anchor does not resolve in the current tree, or its
    /// offset exceeds the node's text length
    OutOfRange,
    /// The edit would produce a structurally invalid tree
    InvalidBoundary,
}

/// Errors that can occur while loading or editing a contract document
#[derive(Debug, Clone, PartialEq)]
pub enum EditorError {
    /// Structurally unbalanced clause fences. All other malformed markdown
    /// degrades to literal text instead of failing.
    Parse(String),
    /// The edit was refused; the tree is unchanged
    Rejected(RejectReason),
    /// A transformation failed its round-trip or mark-canonicalization
    /// check. The in-progress mutation is discarded and the prior tree
    /// version retained.
    Invariant(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Locked => write!(f, "locked region"),
            RejectReason::OutOfRange => write!(f, "selection out of range"),
            RejectReason::InvalidBoundary => write!(f, "invalid structural boundary"),
        }
    }
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Parse(msg) => write!(f, "Parse error: {msg}"),
            EditorError::Rejected(reason) => write!(f, "Edit rejected: {reason}"),
            EditorError::Invariant(msg) => write!(f, "Invariant violation: {msg}"),
        }
    }
}

impl std::error::Error for EditorError {}
