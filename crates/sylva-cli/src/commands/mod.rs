pub mod compile;
pub mod diagnostics;
pub mod dump;
pub mod grammar_loader;
pub mod parse;
pub mod reparse;
pub mod source_loader;
pub mod trace;
pub mod tree_output;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod reparse_tests;
