//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("sylva")
        .about("Incremental parsing with compiled grammar tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(compile_command())
        .subcommand(dump_command())
        .subcommand(parse_command())
        .subcommand(trace_command())
        .subcommand(reparse_command())
}

pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Compile a grammar.json into a grammar table")
        .after_help(
            r#"EXAMPLES:
  sylva compile grammar.json -o calc.sylt"#,
        )
        .arg(grammar_json_arg())
        .arg(output_file_arg())
        .arg(color_arg())
}

pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the symbols, states, and lex modes of a grammar table")
        .after_help(
            r#"EXAMPLES:
  sylva dump grammar.json
  sylva dump calc.sylt --color never
  sylva dump veryl"#,
        )
        .arg(grammar_arg())
        .arg(color_arg())
}

pub fn parse_command() -> Command {
    Command::new("parse")
        .about("Parse a source file and print its syntax tree")
        .after_help(
            r#"EXAMPLES:
  sylva parse grammar.json input.txt
  sylva parse calc.sylt input.txt --spans
  sylva parse calc.sylt input.txt --json
  sylva parse calc.sylt input.txt -q     # errors only, exit 1 on failure"#,
        )
        .arg(grammar_arg())
        .arg(source_arg())
        .arg(spans_arg())
        .arg(json_arg())
        .arg(quiet_arg())
        .arg(color_arg())
}

pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Trace every parser step")
        .after_help(
            r#"EXAMPLES:
  sylva trace grammar.json input.txt
  sylva trace grammar.json input.txt -v    # include lexer steps
  sylva trace grammar.json input.txt -vv   # include lex modes and token text"#,
        )
        .arg(grammar_arg())
        .arg(source_arg())
        .arg(verbose_arg())
        .arg(color_arg())
}

pub fn reparse_command() -> Command {
    Command::new("reparse")
        .about("Parse OLD, then reparse NEW incrementally and report reuse")
        .after_help(
            r#"EXAMPLES:
  sylva reparse grammar.json before.txt after.txt"#,
        )
        .arg(grammar_arg())
        .arg(old_source_arg())
        .arg(new_source_arg())
        .arg(color_arg())
}
