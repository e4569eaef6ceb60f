//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;
use sylva_runtime::Verbosity;

use super::ColorChoice;
use crate::commands::compile::CompileArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::parse::{OutputFormat, ParseArgs};
use crate::commands::reparse::ReparseArgs;
use crate::commands::trace::TraceArgs;

pub struct CompileParams {
    pub grammar_path: PathBuf,
    pub output: PathBuf,
    pub color: ColorChoice,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: path(m, "grammar"),
            output: path(m, "output"),
            color: parse_color(m),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            output: p.output,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub grammar: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: path(m, "grammar"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            grammar: p.grammar,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ParseParams {
    pub grammar: PathBuf,
    pub source_path: PathBuf,
    pub spans: bool,
    pub json: bool,
    pub quiet: bool,
    pub color: ColorChoice,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: path(m, "grammar"),
            source_path: path(m, "source"),
            spans: m.get_flag("spans"),
            json: m.get_flag("json"),
            quiet: m.get_flag("quiet"),
            color: parse_color(m),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        let format = if p.quiet {
            OutputFormat::None
        } else if p.json {
            OutputFormat::Json
        } else {
            OutputFormat::Tree { spans: p.spans }
        };
        Self {
            grammar: p.grammar,
            source_path: p.source_path,
            format,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TraceParams {
    pub grammar: PathBuf,
    pub source_path: PathBuf,
    pub verbose: u8,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: path(m, "grammar"),
            source_path: path(m, "source"),
            verbose: m.get_count("verbose"),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        };

        Self {
            grammar: p.grammar,
            source_path: p.source_path,
            verbosity,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ReparseParams {
    pub grammar: PathBuf,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub color: ColorChoice,
}

impl ReparseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: path(m, "grammar"),
            old_path: path(m, "old"),
            new_path: path(m, "new"),
            color: parse_color(m),
        }
    }
}

impl From<ReparseParams> for ReparseArgs {
    fn from(p: ReparseParams) -> Self {
        Self {
            grammar: p.grammar,
            old_path: p.old_path,
            new_path: p.new_path,
            color: p.color.should_colorize(),
        }
    }
}

/// Required positional paths; clap rejects the command line before we get here.
fn path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
