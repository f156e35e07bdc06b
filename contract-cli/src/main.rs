// Command-line interface for contract markdown files
//
// This binary provides commands for inspecting and converting contract
// markdown templates. The core capabilities live in the contract-editor
// crate; this layer only reads files, picks an output shape, and writes.
//
// Usage:
//  contract convert <input> [--to <target>] [--output <file>]  - Re-emit a file
//  contract clauses <input>                                    - List clause metadata
//  contract check <input>                                      - Validate clause fences
//
// Targets for convert:
//  markdown (default) - normalized contract markdown
//  ast-json           - the parsed AST as JSON
//  tree-json          - the render projection of the document tree as JSON
//  tag                - an indented tag view of the AST

mod transforms;

use clap::{Arg, ArgMatches, Command, ValueHint};
use contract_config::{ContractConfig, Loader};
use contract_editor::EditorOptions;
use std::fs;

fn build_cli() -> Command {
    Command::new("contract")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting and converting contract markdown files")
        .long_about(
            "contract is a command-line tool for working with contract markdown templates.\n\n\
            Commands:\n  \
            - convert: re-emit a template as markdown, JSON, or a tag view\n  \
            - clauses: list clause ids, types, and lock state\n  \
            - check:   validate clause fence structure\n\n\
            Examples:\n  \
            contract convert agreement.md                   # normalized markdown to stdout\n  \
            contract convert agreement.md --to ast-json     # parsed AST as JSON\n  \
            contract convert agreement.md --to tree-json    # render projection as JSON\n  \
            contract clauses agreement.md                   # one clause per line\n  \
            contract check agreement.md                     # exit 1 on unbalanced fences",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a contract.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a contract markdown file to another representation")
                .arg(
                    Arg::new("input")
                        .help("Path to the contract markdown file")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("TARGET")
                        .help("Output representation")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::CONVERT_TARGETS,
                        ))
                        .default_value("markdown"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("Write output to a file instead of stdout")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("clauses")
                .about("List clause ids, types, and lock state")
                .arg(
                    Arg::new("input")
                        .help("Path to the contract markdown file")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate clause fence structure")
                .arg(
                    Arg::new("input")
                        .help("Path to the contract markdown file")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();
    if let Err(message) = run(&matches) {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let config = load_config(matches)?;
    let options: EditorOptions = (&config.editing).into();

    match matches.subcommand() {
        Some(("convert", sub)) => convert(sub, &options),
        Some(("clauses", sub)) => clauses(sub, &options),
        Some(("check", sub)) => check(sub),
        _ => Err("a subcommand is required".to_string()),
    }
}

fn load_config(matches: &ArgMatches) -> Result<ContractConfig, String> {
    let loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file("contract.toml"),
    };
    loader
        .build()
        .map_err(|e| format!("failed to load configuration: {e}"))
}

fn read_input(sub: &ArgMatches) -> Result<(String, String), String> {
    let path = sub
        .get_one::<String>("input")
        .ok_or_else(|| "an input file is required".to_string())?;
    let source = fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    Ok((path.clone(), source))
}

fn convert(sub: &ArgMatches, options: &EditorOptions) -> Result<(), String> {
    let (path, source) = read_input(sub)?;
    let doc = contract_editor::parse(&source).map_err(|e| format!("{path}: {e}"))?;
    let target = sub
        .get_one::<String>("to")
        .map(String::as_str)
        .unwrap_or("markdown");
    let output = transforms::run(&doc, target, options)?;

    match sub.get_one::<String>("output") {
        Some(file) => {
            fs::write(file, output).map_err(|e| format!("failed to write {file}: {e}"))?
        }
        None => print!("{output}"),
    }
    Ok(())
}

fn clauses(sub: &ArgMatches, options: &EditorOptions) -> Result<(), String> {
    let (path, source) = read_input(sub)?;
    let doc = contract_editor::parse(&source).map_err(|e| format!("{path}: {e}"))?;
    print!("{}", transforms::clause_table(&doc, options));
    Ok(())
}

fn check(sub: &ArgMatches) -> Result<(), String> {
    let (path, source) = read_input(sub)?;
    let doc = contract_editor::parse(&source).map_err(|e| format!("{path}: {e}"))?;
    let count = transforms::collect_clauses(&doc).len();
    println!("ok: {count} clauses");
    Ok(())
}
