//! Grammar fixtures for runtime tests.

use std::sync::{Arc, OnceLock};

use sylva_core::Grammar;
use sylva_table::GrammarTable;

use crate::{Parser, Tree};

/// A small expression language: `let` bindings, calls, and left-associative
/// arithmetic, with whitespace and `#` comments as extras.
pub const CALC: &str = r##"{
  "name": "calc",
  "extras": [
    {"type": "PATTERN", "value": "\\s"},
    {"type": "SYMBOL", "name": "comment"}
  ],
  "rules": {
    "source_file": {"type": "REPEAT", "content": {"type": "SYMBOL", "name": "_statement"}},
    "_statement": {"type": "CHOICE", "members": [
      {"type": "SYMBOL", "name": "let_statement"},
      {"type": "SYMBOL", "name": "expression_statement"}
    ]},
    "let_statement": {"type": "SEQ", "members": [
      {"type": "STRING", "value": "let"},
      {"type": "FIELD", "name": "name", "content": {"type": "SYMBOL", "name": "identifier"}},
      {"type": "STRING", "value": "="},
      {"type": "FIELD", "name": "value", "content": {"type": "SYMBOL", "name": "_expression"}},
      {"type": "STRING", "value": ";"}
    ]},
    "expression_statement": {"type": "SEQ", "members": [
      {"type": "SYMBOL", "name": "_expression"},
      {"type": "STRING", "value": ";"}
    ]},
    "_expression": {"type": "CHOICE", "members": [
      {"type": "SYMBOL", "name": "identifier"},
      {"type": "SYMBOL", "name": "number"},
      {"type": "SYMBOL", "name": "call_expression"},
      {"type": "SYMBOL", "name": "parenthesized_expression"},
      {"type": "SYMBOL", "name": "binary_expression"}
    ]},
    "call_expression": {"type": "PREC", "value": 3, "content": {"type": "SEQ", "members": [
      {"type": "FIELD", "name": "function", "content": {"type": "SYMBOL", "name": "_expression"}},
      {"type": "FIELD", "name": "arguments", "content": {"type": "SYMBOL", "name": "argument_list"}}
    ]}},
    "argument_list": {"type": "SEQ", "members": [
      {"type": "STRING", "value": "("},
      {"type": "CHOICE", "members": [
        {"type": "SEQ", "members": [
          {"type": "SYMBOL", "name": "_expression"},
          {"type": "REPEAT", "content": {"type": "SEQ", "members": [
            {"type": "STRING", "value": ","},
            {"type": "SYMBOL", "name": "_expression"}
          ]}}
        ]},
        {"type": "BLANK"}
      ]},
      {"type": "STRING", "value": ")"}
    ]},
    "parenthesized_expression": {"type": "SEQ", "members": [
      {"type": "STRING", "value": "("},
      {"type": "SYMBOL", "name": "_expression"},
      {"type": "STRING", "value": ")"}
    ]},
    "binary_expression": {"type": "CHOICE", "members": [
      {"type": "PREC_LEFT", "value": 1, "content": {"type": "SEQ", "members": [
        {"type": "FIELD", "name": "left", "content": {"type": "SYMBOL", "name": "_expression"}},
        {"type": "FIELD", "name": "operator", "content": {"type": "STRING", "value": "+"}},
        {"type": "FIELD", "name": "right", "content": {"type": "SYMBOL", "name": "_expression"}}
      ]}},
      {"type": "PREC_LEFT", "value": 1, "content": {"type": "SEQ", "members": [
        {"type": "FIELD", "name": "left", "content": {"type": "SYMBOL", "name": "_expression"}},
        {"type": "FIELD", "name": "operator", "content": {"type": "STRING", "value": "-"}},
        {"type": "FIELD", "name": "right", "content": {"type": "SYMBOL", "name": "_expression"}}
      ]}},
      {"type": "PREC_LEFT", "value": 2, "content": {"type": "SEQ", "members": [
        {"type": "FIELD", "name": "left", "content": {"type": "SYMBOL", "name": "_expression"}},
        {"type": "FIELD", "name": "operator", "content": {"type": "STRING", "value": "*"}},
        {"type": "FIELD", "name": "right", "content": {"type": "SYMBOL", "name": "_expression"}}
      ]}},
      {"type": "PREC_LEFT", "value": 2, "content": {"type": "SEQ", "members": [
        {"type": "FIELD", "name": "left", "content": {"type": "SYMBOL", "name": "_expression"}},
        {"type": "FIELD", "name": "operator", "content": {"type": "STRING", "value": "/"}},
        {"type": "FIELD", "name": "right", "content": {"type": "SYMBOL", "name": "_expression"}}
      ]}}
    ]},
    "identifier": {"type": "PATTERN", "value": "[a-zA-Z_][a-zA-Z0-9_]*"},
    "number": {"type": "PATTERN", "value": "\\d+"},
    "comment": {"type": "TOKEN", "content": {"type": "SEQ", "members": [
      {"type": "STRING", "value": "#"},
      {"type": "PATTERN", "value": ".*"}
    ]}}
  }
}"##;

/// A grammar with a single literal token.
pub const HELLO: &str = r#"{
  "name": "hello",
  "rules": {
    "source_file": {"type": "STRING", "value": "hello"}
  }
}"#;

pub fn compile(json: &str) -> Arc<GrammarTable> {
    let grammar = Grammar::from_json(json).unwrap();
    Arc::new(sylva_compiler::compile_table(&grammar).unwrap())
}

pub fn calc() -> Arc<GrammarTable> {
    static TABLE: OnceLock<Arc<GrammarTable>> = OnceLock::new();
    TABLE.get_or_init(|| compile(CALC)).clone()
}

pub fn hello() -> Arc<GrammarTable> {
    static TABLE: OnceLock<Arc<GrammarTable>> = OnceLock::new();
    TABLE.get_or_init(|| compile(HELLO)).clone()
}

pub fn parse_calc(text: &str) -> Tree {
    Parser::new(calc()).parse(text, None).unwrap()
}

pub fn sexp(text: &str) -> String {
    parse_calc(text).root_node().to_sexp()
}
