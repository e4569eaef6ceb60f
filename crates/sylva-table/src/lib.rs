#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compiled grammar tables.
//!
//! A grammar table is the immutable artifact a parse runs against: symbol
//! metadata, LALR parse actions, lex modes, and token DFAs. This crate
//! defines the binary layout and the validating loader.

mod dump;
mod format;
mod header;
mod ids;
mod table;
mod types;

#[cfg(test)]
mod header_tests;

pub use dump::dump;
pub use format::{
    ACTION_SIZE, LEX_MODE_SIZE, MAGIC, PRODUCTION_SIZE, SECTION_ALIGN, STATE_SIZE,
    SUPPORTED_VERSIONS, SYMBOL_SIZE, VERSION, action_kind, symbol_flags,
};
pub use header::{Header, SectionOffsets};
pub use ids::{ERROR_LEX_MODE, FieldId, LexModeId, ProductionId, StateId, StringId, Symbol};
pub use table::{GrammarTable, LoadError};
pub use types::{Action, Lexeme, Production, SymbolInfo};
