#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar tables bundled with Sylva.
//!
//! Each grammar under `grammars/` is compiled by the build script and
//! embedded in the binary; the accessor loads it once and hands out
//! shared handles.

use std::sync::{Arc, OnceLock};

use sylva_table::{GrammarTable, LoadError};

#[cfg(test)]
mod lib_tests;

static VERYL_TABLE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/veryl.sylt"));

/// A bundled grammar: its name and its loader.
pub struct BundledGrammar {
    pub name: &'static str,
    load: fn() -> Result<Arc<GrammarTable>, LoadError>,
}

impl BundledGrammar {
    pub fn load(&self) -> Result<Arc<GrammarTable>, LoadError> {
        (self.load)()
    }
}

static ALL: &[BundledGrammar] = &[BundledGrammar {
    name: "veryl",
    load: veryl,
}];

/// The `veryl` grammar.
pub fn veryl() -> Result<Arc<GrammarTable>, LoadError> {
    static TABLE: OnceLock<Arc<GrammarTable>> = OnceLock::new();
    if let Some(table) = TABLE.get() {
        return Ok(Arc::clone(table));
    }
    let table = Arc::new(GrammarTable::load(VERYL_TABLE)?);
    Ok(Arc::clone(TABLE.get_or_init(|| table)))
}

/// Every bundled grammar.
pub fn all() -> &'static [BundledGrammar] {
    ALL
}

/// Look up a bundled grammar by name, ignoring case.
pub fn from_name(name: &str) -> Option<&'static BundledGrammar> {
    ALL.iter().find(|grammar| grammar.name.eq_ignore_ascii_case(name))
}
