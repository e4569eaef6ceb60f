use std::path::{Path, PathBuf};
use std::sync::Arc;

use sylva_core::Grammar;
use sylva_runtime::{GrammarTable, Parser, Tree};

/// `name = 12;` assignments, one or more per file.
pub const ASSIGN: &str = r#"{
  "name": "assign",
  "rules": {
    "source_file": {"type": "REPEAT", "content": {"type": "SYMBOL", "name": "assignment"}},
    "assignment": {"type": "SEQ", "members": [
      {"type": "FIELD", "name": "name", "content": {"type": "SYMBOL", "name": "identifier"}},
      {"type": "STRING", "value": "="},
      {"type": "FIELD", "name": "value", "content": {"type": "SYMBOL", "name": "number"}},
      {"type": "STRING", "value": ";"}
    ]},
    "identifier": {"type": "PATTERN", "value": "[a-z]+"},
    "number": {"type": "PATTERN", "value": "\\d+"}
  },
  "extras": [{"type": "PATTERN", "value": "\\s"}]
}"#;

pub fn table() -> Arc<GrammarTable> {
    let grammar = Grammar::from_json(ASSIGN).unwrap();
    Arc::new(sylva_compiler::compile_table(&grammar).unwrap())
}

pub fn parse(text: &str) -> Tree {
    Parser::new(table()).parse(text, None).unwrap()
}

pub fn write_file(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
