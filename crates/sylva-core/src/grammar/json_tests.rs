use indoc::indoc;

use super::*;

#[test]
fn parse_minimal_grammar() {
    let json = r#"{
        "name": "test",
        "rules": {
            "source_file": { "type": "SYMBOL", "name": "expression" },
            "expression": { "type": "STRING", "value": "x" }
        }
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    assert_eq!(grammar.name, "test");
    assert_eq!(grammar.rules.len(), 2);
    assert!(grammar.extras.is_empty());
}

#[test]
fn keeps_definition_order() {
    let json = r#"{
        "name": "test",
        "rules": {
            "program": { "type": "SYMBOL", "name": "statement" },
            "statement": { "type": "SYMBOL", "name": "expression" },
            "expression": { "type": "STRING", "value": "x" }
        }
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    let names: Vec<&str> = grammar.rules.keys().map(String::as_str).collect();
    assert_eq!(names, ["program", "statement", "expression"]);
    assert_eq!(grammar.start_rule().map(|(name, _)| name), Some("program"));
}

#[test]
fn parse_nested_rule_kinds() {
    let json = indoc! {r#"
        {
          "name": "test",
          "extras": [{ "type": "PATTERN", "value": "\\s" }],
          "precedences": [[{ "type": "STRING", "value": "call" }, { "type": "SYMBOL", "name": "binary" }]],
          "rules": {
            "root": {
              "type": "PREC_LEFT",
              "value": "call",
              "content": {
                "type": "SEQ",
                "members": [
                  { "type": "FIELD", "name": "head", "content": { "type": "STRING", "value": "a" } },
                  { "type": "REPEAT1", "content": { "type": "PATTERN", "value": "b+", "flags": "i" } },
                  { "type": "IMMEDIATE_TOKEN", "content": { "type": "STRING", "value": "!" } },
                  { "type": "CHOICE", "members": [{ "type": "BLANK" }, { "type": "PREC", "value": 2, "content": { "type": "STRING", "value": "c" } }] }
                ]
              }
            }
          }
        }
    "#};

    let grammar = Grammar::from_json(json).unwrap();
    assert_eq!(grammar.extras.len(), 1);
    assert_eq!(
        grammar.precedences[0],
        [
            PrecedenceEntry::Name("call".into()),
            PrecedenceEntry::Symbol("binary".into())
        ]
    );

    let Rule::PrecLeft { value, content } = grammar.rule("root").unwrap() else {
        panic!("expected PREC_LEFT");
    };
    assert_eq!(value, &Precedence::Name("call".into()));
    let Rule::Seq(members) = content.as_ref() else {
        panic!("expected SEQ");
    };
    assert!(matches!(&members[0], Rule::Field { name, .. } if name == "head"));
    assert!(matches!(
        &members[1],
        Rule::Repeat1(inner) if matches!(inner.as_ref(), Rule::Pattern { flags: Some(f), .. } if f == "i")
    ));
    assert!(matches!(&members[2], Rule::ImmediateToken(_)));
    assert!(matches!(&members[3], Rule::Choice(alts) if alts[0] == Rule::Blank));
}

#[test]
fn rejects_empty_rules() {
    let err = Grammar::from_json(r#"{ "name": "empty", "rules": {} }"#).unwrap_err();
    assert_eq!(err.to_string(), "grammar 'empty' defines no rules");
}

#[test]
fn rejects_unknown_rule_type() {
    let json = r#"{ "name": "bad", "rules": { "a": { "type": "LOOKAHEAD" } } }"#;
    let err = Grammar::from_json(json).unwrap_err();
    assert!(matches!(err, GrammarError::Json(_)));
}

#[test]
fn missing_file_reports_path() {
    let err = Grammar::from_path("/nonexistent/grammar.json").unwrap_err();
    assert!(err.to_string().starts_with("failed to read /nonexistent/grammar.json"));
}
