//! Tree-sitter grammar definitions.
//!
//! `grammar.json` is the evaluated form of a `grammar.js` file. Sylva never
//! runs the JavaScript DSL; it starts from the JSON.

mod json;
mod types;

#[cfg(test)]
mod json_tests;
#[cfg(test)]
mod types_tests;

pub use json::GrammarError;
pub use types::{Grammar, Precedence, PrecedenceEntry, Rule};
