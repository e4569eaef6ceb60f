//! String table builder.
//!
//! Strings are stored back to back in the string blob; the table holds
//! `count + 1` offsets so string `i` spans `offsets[i]..offsets[i + 1]`.

use std::collections::HashMap;

use sylva_table::StringId;

use crate::{Error, Result};

#[derive(Debug, Default)]
pub(crate) struct StringTableBuilder {
    lookup: HashMap<String, StringId>,
    strings: Vec<String>,
}

impl StringTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, value: &str) -> Result<StringId> {
        if let Some(&id) = self.lookup.get(value) {
            return Ok(id);
        }
        let index = self.strings.len();
        if index >= u16::MAX as usize {
            return Err(Error::TooMany {
                what: "strings",
                count: index + 1,
            });
        }
        let id = index as StringId;
        self.strings.push(value.to_owned());
        self.lookup.insert(value.to_owned(), id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns (blob_bytes, table_bytes).
    pub fn emit(&self) -> (Vec<u8>, Vec<u8>) {
        let mut blob = Vec::new();
        let mut table = Vec::with_capacity((self.strings.len() + 1) * 4);
        table.extend_from_slice(&0u32.to_le_bytes());
        for s in &self.strings {
            blob.extend_from_slice(s.as_bytes());
            table.extend_from_slice(&(blob.len() as u32).to_le_bytes());
        }
        (blob, table)
    }
}
