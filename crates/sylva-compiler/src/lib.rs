//! Sylva table generator: turns an evaluated `grammar.json` into a binary
//! grammar table.
//!
//! - `lower` - flattens grammar rules into productions and terminals
//! - `lalr` - builds LALR(1) states and resolves conflicts
//! - `emit` - serializes the table

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod emit;
mod lalr;
mod lower;

#[cfg(test)]
mod test_utils;

use sylva_core::{Grammar, GrammarError};
use sylva_table::{GrammarTable, LoadError};

/// Errors produced while generating a grammar table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("rule '{rule}' references undefined symbol '{symbol}'")]
    UnknownSymbol { rule: String, symbol: String },

    #[error("rule '{0}' matches the empty string; only the start rule may")]
    EmptyRule(String),

    #[error("token '{0}' matches the empty string")]
    EmptyToken(String),

    #[error("invalid pattern /{pattern}/ in rule '{rule}': {message}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },

    #[error("unsupported {feature} in rule '{rule}'")]
    Unsupported { rule: String, feature: &'static str },

    #[error("unknown precedence '{name}' in rule '{rule}'")]
    UnknownPrecedence { rule: String, name: String },

    #[error("unresolved {kind} conflict on {lookahead}: {}", .candidates.join(" | "))]
    Conflict {
        kind: &'static str,
        lookahead: String,
        candidates: Vec<String>,
    },

    #[error("too many {what} ({count})")]
    TooMany { what: &'static str, count: usize },

    #[error("generated table does not load: {0}")]
    Load(#[from] LoadError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Generate the binary table for a grammar.
pub fn compile(grammar: &Grammar) -> Result<Vec<u8>> {
    let lowered = lower::lower(grammar)?;
    let table = lalr::build(&lowered)?;
    emit::emit(&lowered, &table)
}

pub fn compile_json(json: &str) -> Result<Vec<u8>> {
    compile(&Grammar::from_json(json)?)
}

/// Generate a table and load it, for callers that parse right away.
pub fn compile_table(grammar: &Grammar) -> Result<GrammarTable> {
    let bytes = compile(grammar)?;
    Ok(GrammarTable::load(&bytes)?)
}
