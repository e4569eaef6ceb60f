//! Regex table builder.
//!
//! Each token pattern is compiled to an anchored sparse DFA that reports
//! every match end (`MatchKind::All`), so the lexer can pick the longest.
//! Entries store the pattern's StringId for display and the DFA's offset
//! into the regex blob.

use std::collections::HashMap;

use regex_automata::MatchKind;
use regex_automata::dfa::{StartKind, dense};

use sylva_table::StringId;

use crate::{Error, Result};

#[derive(Debug)]
struct RegexEntry {
    string_id: StringId,
    dfa_bytes: Vec<u8>,
}

/// Index 0 is unused (regex id 0 means "no lexeme").
#[derive(Debug)]
pub(crate) struct RegexTableBuilder {
    lookup: HashMap<StringId, u16>,
    entries: Vec<Option<RegexEntry>>,
}

impl RegexTableBuilder {
    pub fn new() -> Self {
        Self {
            lookup: HashMap::new(),
            entries: vec![None],
        }
    }

    /// Compile a pattern, or return the id it already has. `rule` names the
    /// token in errors.
    pub fn intern(&mut self, pattern: &str, string_id: StringId, rule: &str) -> Result<u16> {
        if let Some(&id) = self.lookup.get(&string_id) {
            return Ok(id);
        }

        let invalid = |message: String| Error::InvalidPattern {
            rule: rule.to_owned(),
            pattern: pattern.to_owned(),
            message,
        };
        let dense = dense::DFA::builder()
            .configure(
                dense::DFA::config()
                    .start_kind(StartKind::Anchored)
                    .match_kind(MatchKind::All)
                    .minimize(true),
            )
            .build(pattern)
            .map_err(|e| invalid(e.to_string()))?;
        let sparse = dense.to_sparse().map_err(|e| invalid(e.to_string()))?;
        let dfa_bytes = sparse.to_bytes_little_endian();

        let id = self.entries.len();
        if id >= u16::MAX as usize {
            return Err(Error::TooMany {
                what: "token patterns",
                count: id + 1,
            });
        }
        self.entries.push(Some(RegexEntry {
            string_id,
            dfa_bytes,
        }));
        self.lookup.insert(string_id, id as u16);
        Ok(id as u16)
    }

    /// Number of regexes, including reserved index 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns (blob_bytes, table_bytes).
    ///
    /// Table entry: `string_id (u16) | reserved (u16) | offset (u32)`,
    /// followed by a sentinel holding the blob end.
    pub fn emit(&self) -> (Vec<u8>, Vec<u8>) {
        let mut blob = Vec::new();
        let mut table = Vec::with_capacity((self.entries.len() + 1) * 8);

        for entry in &self.entries {
            let rem = blob.len() % 4;
            if rem != 0 {
                blob.resize(blob.len() + (4 - rem), 0);
            }

            let (string_id, offset) = match entry {
                Some(e) => {
                    let offset = blob.len() as u32;
                    blob.extend_from_slice(&e.dfa_bytes);
                    (e.string_id, offset)
                }
                None => (0, 0),
            };
            table.extend_from_slice(&string_id.to_le_bytes());
            table.extend_from_slice(&0u16.to_le_bytes());
            table.extend_from_slice(&offset.to_le_bytes());
        }

        table.extend_from_slice(&0u16.to_le_bytes());
        table.extend_from_slice(&0u16.to_le_bytes());
        table.extend_from_slice(&(blob.len() as u32).to_le_bytes());

        (blob, table)
    }
}
