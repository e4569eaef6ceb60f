#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar model for Sylva.
//!
//! Holds the in-memory form of a tree-sitter `grammar.json` file and the
//! terminal palette used by table dumps and parser traces.

mod colors;
pub mod grammar;

pub use colors::Colors;
pub use grammar::{Grammar, GrammarError, Precedence, PrecedenceEntry, Rule};
