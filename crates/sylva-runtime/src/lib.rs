//! Sylva parser runtime.
//!
//! Lexes and parses source text against a compiled [`GrammarTable`],
//! producing immutable concrete syntax trees. Trees can be edited and
//! re-parsed incrementally; unchanged subtrees are reused.
//!
//! ```ignore
//! let mut parser = Parser::new(table);
//! let tree = parser.parse("let x = 1;", None)?;
//! println!("{}", tree.root_node().to_sexp());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod edit;
mod error;
mod length;
mod lexer;
mod parser;
mod tree;

#[cfg(test)]
mod test_utils;

pub use edit::InputEdit;
pub use error::ParseError;
pub use length::{Length, Point};
pub use lexer::{Lexer, Token};
pub use parser::{NoopTracer, ParseStats, Parser, PrintTracer, Recovery, Tracer, Verbosity};
pub use sylva_table::GrammarTable;
pub use tree::{Node, Tree, TreeCursor};
