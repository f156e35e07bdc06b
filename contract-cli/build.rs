use clap::{Arg, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the convert targets from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const CONVERT_TARGETS: &[&str] = &["markdown", "ast-json", "tree-json", "tag"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("contract")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting and converting contract markdown files")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_parser(clap::builder::PossibleValuesParser::new(CONVERT_TARGETS)),
                ),
        )
        .subcommand(Command::new("clauses").arg(
            Arg::new("input")
                .required(true)
                .value_hint(ValueHint::FilePath),
        ))
        .subcommand(Command::new("check").arg(
            Arg::new("input")
                .required(true)
                .value_hint(ValueHint::FilePath),
        ));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "contract", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "contract", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "contract", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
