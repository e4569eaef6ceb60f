//! Binary table emission.
//!
//! - String table construction and interning
//! - Token DFA compilation into the regex blob
//! - Section assembly and header generation

mod emitter;
mod regex_table;
mod string_table;

#[cfg(test)]
mod emit_tests;
#[cfg(test)]
mod string_table_tests;

pub(crate) use emitter::emit;
