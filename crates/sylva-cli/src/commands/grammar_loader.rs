//! Resolve the GRAMMAR argument to a loaded table.
//!
//! A GRAMMAR is a compiled table (recognized by its magic bytes), a
//! `grammar.json` compiled on the fly, or the name of a bundled grammar.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sylva_core::Grammar;
use sylva_table::{GrammarTable, LoadError, MAGIC};

#[derive(Debug, thiserror::Error)]
pub enum GrammarLoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("grammar '{}' is neither a compiled table nor UTF-8 JSON", path.display())]
    NotUtf8 { path: PathBuf },

    #[error(transparent)]
    Compile(#[from] sylva_compiler::Error),

    #[error(transparent)]
    Table(#[from] LoadError),
}

pub fn load_grammar(name: &Path) -> Result<Arc<GrammarTable>, GrammarLoadError> {
    if !name.exists()
        && let Some(bundled) = name.to_str().and_then(sylva_langs::from_name)
    {
        return Ok(bundled.load()?);
    }

    let bytes = std::fs::read(name).map_err(|source| GrammarLoadError::Read {
        path: name.to_path_buf(),
        source,
    })?;
    if bytes.starts_with(&MAGIC) {
        return Ok(Arc::new(GrammarTable::load(&bytes)?));
    }
    let table = sylva_compiler::compile_table(&parse_json(name, &bytes)?)?;
    Ok(Arc::new(table))
}

/// Compile a `grammar.json` file to table bytes.
pub fn compile_grammar(path: &Path) -> Result<Vec<u8>, GrammarLoadError> {
    let bytes = std::fs::read(path).map_err(|source| GrammarLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(sylva_compiler::compile(&parse_json(path, &bytes)?)?)
}

fn parse_json(path: &Path, bytes: &[u8]) -> Result<Grammar, GrammarLoadError> {
    let json = std::str::from_utf8(bytes).map_err(|_| GrammarLoadError::NotUtf8 {
        path: path.to_path_buf(),
    })?;
    Grammar::from_json(json).map_err(|e| GrammarLoadError::Compile(e.into()))
}
