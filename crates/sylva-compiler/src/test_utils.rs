//! Grammar fixtures for table generator tests.

use sylva_core::Grammar;
use sylva_table::{Action, GrammarTable, Symbol};

pub fn grammar(json: &str) -> Grammar {
    Grammar::from_json(json).unwrap()
}

pub fn compile_ok(json: &str) -> GrammarTable {
    crate::compile_table(&grammar(json)).unwrap()
}

pub fn compile_err(json: &str) -> String {
    crate::compile_json(json).unwrap_err().to_string()
}

/// Actions on `lookahead` across all states.
pub fn actions_on(table: &GrammarTable, lookahead: Symbol) -> Vec<Action> {
    (0..table.state_count() as u16)
        .filter_map(|state| table.action(state, lookahead))
        .collect()
}

/// `expression: number | expression <op> expression`, with the binary rule
/// wrapped in `wrapper`.
pub fn binary_grammar(wrapper: &str) -> String {
    let binary = r#"{
        "type": "SEQ",
        "members": [
            {"type": "SYMBOL", "name": "expression"},
            {"type": "STRING", "value": "-"},
            {"type": "SYMBOL", "name": "expression"}
        ]
    }"#;
    let binary = match wrapper {
        "" => binary.to_owned(),
        wrapper => format!(r#"{{"type": "{wrapper}", "value": 1, "content": {binary}}}"#),
    };
    format!(
        r#"{{
            "name": "binary",
            "extras": [{{"type": "PATTERN", "value": "\\s"}}],
            "rules": {{
                "expression": {{
                    "type": "CHOICE",
                    "members": [
                        {{"type": "SYMBOL", "name": "number"}},
                        {binary}
                    ]
                }},
                "number": {{"type": "PATTERN", "value": "\\d+"}}
            }}
        }}"#
    )
}
