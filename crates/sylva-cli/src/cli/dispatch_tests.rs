//! Tests for CLI dispatch logic.

use std::path::PathBuf;

use sylva_runtime::Verbosity;

use super::*;
use crate::cli::commands::{
    compile_command, dump_command, parse_command, reparse_command, trace_command,
};
use crate::commands::parse::{OutputFormat, ParseArgs};
use crate::commands::trace::TraceArgs;

#[test]
fn compile_requires_output() {
    let result = compile_command().try_get_matches_from(["compile", "grammar.json"]);
    assert!(result.is_err());

    let m = compile_command()
        .try_get_matches_from(["compile", "grammar.json", "-o", "out.sylt"])
        .unwrap();
    let params = CompileParams::from_matches(&m);
    assert_eq!(params.grammar_path, PathBuf::from("grammar.json"));
    assert_eq!(params.output, PathBuf::from("out.sylt"));
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn dump_takes_color() {
    let m = dump_command()
        .try_get_matches_from(["dump", "calc.sylt", "--color", "never"])
        .unwrap();
    let params = DumpParams::from_matches(&m);
    assert_eq!(params.grammar, PathBuf::from("calc.sylt"));
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn color_rejects_unknown_values() {
    let result = dump_command().try_get_matches_from(["dump", "calc.sylt", "--color", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn parse_defaults_to_tree_output() {
    let m = parse_command()
        .try_get_matches_from(["parse", "g.json", "input.txt"])
        .unwrap();
    let args: ParseArgs = ParseParams::from_matches(&m).into();
    assert_eq!(args.format, OutputFormat::Tree { spans: false });
    assert_eq!(args.source_path, PathBuf::from("input.txt"));
}

#[test]
fn parse_output_flags() {
    let m = parse_command()
        .try_get_matches_from(["parse", "g.json", "input.txt", "--spans"])
        .unwrap();
    let args: ParseArgs = ParseParams::from_matches(&m).into();
    assert_eq!(args.format, OutputFormat::Tree { spans: true });

    let m = parse_command()
        .try_get_matches_from(["parse", "g.json", "input.txt", "--json"])
        .unwrap();
    let args: ParseArgs = ParseParams::from_matches(&m).into();
    assert_eq!(args.format, OutputFormat::Json);

    let m = parse_command()
        .try_get_matches_from(["parse", "g.json", "input.txt", "--json", "-q"])
        .unwrap();
    let args: ParseArgs = ParseParams::from_matches(&m).into();
    assert_eq!(args.format, OutputFormat::None);
}

#[test]
fn parse_json_conflicts_with_spans() {
    let result =
        parse_command().try_get_matches_from(["parse", "g.json", "input.txt", "--json", "--spans"]);
    assert!(result.is_err());
}

#[test]
fn parse_requires_source() {
    assert!(parse_command().try_get_matches_from(["parse", "g.json"]).is_err());
}

#[test]
fn trace_counts_verbosity() {
    let cases = [
        (vec!["trace", "g.json", "in.txt"], Verbosity::Default),
        (vec!["trace", "g.json", "in.txt", "-v"], Verbosity::Verbose),
        (vec!["trace", "g.json", "in.txt", "-vv"], Verbosity::VeryVerbose),
        (vec!["trace", "g.json", "in.txt", "-vvv"], Verbosity::VeryVerbose),
    ];
    for (argv, expected) in cases {
        let m = trace_command().try_get_matches_from(argv).unwrap();
        let args: TraceArgs = TraceParams::from_matches(&m).into();
        assert_eq!(args.verbosity, expected);
    }
}

#[test]
fn reparse_takes_two_sources() {
    let m = reparse_command()
        .try_get_matches_from(["reparse", "g.json", "a.txt", "b.txt", "--color", "always"])
        .unwrap();
    let params = ReparseParams::from_matches(&m);
    assert_eq!(params.old_path, PathBuf::from("a.txt"));
    assert_eq!(params.new_path, PathBuf::from("b.txt"));
    assert!(params.color.should_colorize());
}

#[test]
fn cli_requires_subcommand() {
    assert!(build_cli().try_get_matches_from(["sylva"]).is_err());
    assert!(build_cli().try_get_matches_from(["sylva", "parse", "g.json", "x"]).is_ok());
}

#[test]
fn help_lists_examples() {
    let help = parse_command().render_long_help().to_string();
    assert!(help.contains("EXAMPLES:"));
    assert!(help.contains("--spans"));
    assert!(help.contains("--quiet"));
}
