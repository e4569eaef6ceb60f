//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar to parse with (positional).
pub fn grammar_arg() -> Arg {
    Arg::new("grammar")
        .value_name("GRAMMAR")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("grammar.json, compiled table, or bundled grammar name")
}

/// Grammar JSON to compile (positional).
pub fn grammar_json_arg() -> Arg {
    Arg::new("grammar")
        .value_name("GRAMMAR_JSON")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("grammar.json to compile")
}

/// Source file (positional).
pub fn source_arg() -> Arg {
    Arg::new("source")
        .value_name("SOURCE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Source file to parse (use \"-\" for stdin)")
}

pub fn old_source_arg() -> Arg {
    Arg::new("old")
        .value_name("OLD")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Source before the edit")
}

pub fn new_source_arg() -> Arg {
    Arg::new("new")
        .value_name("NEW")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Source after the edit")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Write the compiled table to file")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Show source positions (--spans).
pub fn spans_arg() -> Arg {
    Arg::new("spans")
        .long("spans")
        .action(ArgAction::SetTrue)
        .help("Show source positions")
}

/// Print the tree as JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .conflicts_with("spans")
        .help("Print the tree as JSON, anonymous nodes included")
}

/// Only report errors (-q/--quiet).
pub fn quiet_arg() -> Arg {
    Arg::new("quiet")
        .short('q')
        .long("quiet")
        .action(ArgAction::SetTrue)
        .help("Don't print the tree, only syntax errors")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v adds lexer steps, -vv adds lex modes and token text)")
}
