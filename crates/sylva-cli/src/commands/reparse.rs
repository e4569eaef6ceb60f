//! Incremental reparse of an edited source, checked against a full parse.

use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use sylva_core::Colors;
use sylva_runtime::{GrammarTable, InputEdit, ParseError, ParseStats, Parser};

use super::grammar_loader::load_grammar;
use super::source_loader::load_source;

pub struct ReparseArgs {
    pub grammar: PathBuf,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub color: bool,
}

/// Outcome of reparsing `new` from the tree of `old`.
#[derive(Debug)]
pub struct ReparseReport {
    pub edit: InputEdit,
    pub incremental: ParseStats,
    pub full: ParseStats,
    pub new_len: usize,
    pub matches: bool,
    pub has_error: bool,
}

pub fn reparse(table: &Arc<GrammarTable>, old: &str, new: &str) -> Result<ReparseReport, ParseError> {
    let mut parser = Parser::new(Arc::clone(table));
    let old_tree = parser.parse(old, None)?;

    let edit = InputEdit::diff(old, new);
    let tree = parser.reparse(&old_tree, &edit, new)?;
    let incremental = parser.stats();

    let fresh = parser.parse(new, None)?;
    let full = parser.stats();

    Ok(ReparseReport {
        edit,
        incremental,
        full,
        new_len: new.len(),
        matches: tree == fresh,
        has_error: tree.has_error(),
    })
}

impl ReparseReport {
    pub fn render(&self, colors: Colors) -> String {
        let c = colors;
        let e = &self.edit;
        let mut out = String::new();
        writeln!(
            out,
            "edit     {}..{} → {}..{} ({} → {})",
            e.start_byte, e.old_end_byte, e.start_byte, e.new_end_byte, e.old_end_position, e.new_end_position
        )
        .unwrap();
        writeln!(
            out,
            "reused   {} nodes, {} of {} bytes",
            self.incremental.nodes_reused, self.incremental.bytes_reused, self.new_len
        )
        .unwrap();
        writeln!(
            out,
            "lexed    {} tokens (full parse: {})",
            self.incremental.tokens_lexed, self.full.tokens_lexed
        )
        .unwrap();
        if self.incremental.recoveries > 0 {
            writeln!(out, "recover  {}", self.incremental.recoveries).unwrap();
        }
        let verdict = if self.matches {
            format!("{}matches full parse{}", c.green, c.reset)
        } else {
            format!("{}differs from full parse{}", c.red, c.reset)
        };
        writeln!(out, "result   {verdict}").unwrap();
        out
    }
}

pub fn run(args: ReparseArgs) {
    let table = load_grammar(&args.grammar).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    let old = load_source(&args.old_path).unwrap_or_else(|msg| {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    });
    let new = load_source(&args.new_path).unwrap_or_else(|msg| {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    });

    let report = match reparse(&table, &old, &new) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    print!("{}", report.render(Colors::new(args.color)));
    if !report.matches {
        std::process::exit(1);
    }
}
