use std::fmt::Write as _;

use indoc::indoc;

use super::{LoweredGrammar, lower};
use crate::test_utils::{compile_err, grammar};

fn render(lowered: &LoweredGrammar) -> String {
    let mut out = String::new();
    for (i, symbol) in lowered.symbols.iter().enumerate() {
        let kind = if symbol.terminal { "terminal" } else { "rule" };
        write!(out, "{i} {} {kind}", symbol.name).unwrap();
        if symbol.named {
            out.push_str(" named");
        }
        if !symbol.visible {
            out.push_str(" hidden");
        }
        if symbol.extra {
            out.push_str(" extra");
        }
        if let Some(token) = symbol.lexeme() {
            write!(out, " /{}/", token.pattern).unwrap();
            if token.immediate {
                out.push_str(" immediate");
            }
            if token.prec != 0 {
                write!(out, " prec={}", token.prec).unwrap();
            }
        }
        out.push('\n');
    }

    out.push('\n');
    for (i, production) in lowered.productions.iter().enumerate() {
        out.push_str(&lowered.describe_production(i));
        for (child, field) in production.fields.iter().enumerate() {
            if let Some(field) = field {
                write!(out, " {child}:{}", lowered.fields[field.get() as usize - 1]).unwrap();
            }
        }
        if let Some(prec) = production.prec {
            write!(out, " [{} {:?}]", prec.value, prec.assoc).unwrap();
        }
        out.push('\n');
    }
    out
}

fn lowered(json: &str) -> String {
    render(&lower(&grammar(json)).unwrap())
}

#[test]
fn repeat_becomes_hidden_helper() {
    let output = lowered(indoc! {r#"
        {
          "name": "list",
          "extras": [{"type": "PATTERN", "value": "\\s"}],
          "rules": {
            "list": {"type": "SEQ", "members": [
              {"type": "STRING", "value": "["},
              {"type": "REPEAT", "content":
                {"type": "FIELD", "name": "item", "content": {"type": "SYMBOL", "name": "number"}}},
              {"type": "STRING", "value": "]"}
            ]},
            "number": {"type": "PATTERN", "value": "\\d+"}
          }
        }
    "#});

    insta::assert_snapshot!(output, @r"
    0 end terminal hidden
    1 ERROR terminal named
    2 list rule named
    3 \s terminal hidden extra /(?:\s)/
    4 [ terminal /\[/
    5 number terminal named /(?:\d+)/
    6 list_repeat1 rule hidden
    7 ] terminal /\]/

    list_repeat1 → list_repeat1 number 1:item
    list_repeat1 → number 0:item
    list → [ list_repeat1 ]
    list → [ ]
    ");
}

#[test]
fn choices_and_optionals_multiply_out() {
    let output = lowered(indoc! {r#"
        {
          "name": "call",
          "rules": {
            "call": {"type": "SEQ", "members": [
              {"type": "FIELD", "name": "function", "content": {"type": "SYMBOL", "name": "name"}},
              {"type": "CHOICE", "members": [
                {"type": "STRING", "value": "()"},
                {"type": "SEQ", "members": [
                  {"type": "STRING", "value": "("},
                  {"type": "SYMBOL", "name": "name"},
                  {"type": "STRING", "value": ")"}
                ]}
              ]},
              {"type": "CHOICE", "members": [{"type": "STRING", "value": ";"}, {"type": "BLANK"}]}
            ]},
            "name": {"type": "PATTERN", "value": "[a-z]+"}
          }
        }
    "#});

    insta::assert_snapshot!(output, @r"
    0 end terminal hidden
    1 ERROR terminal named
    2 call rule named
    3 name terminal named /(?:[a-z]+)/
    4 () terminal /\(\)/
    5 ( terminal /\(/
    6 ) terminal /\)/
    7 ; terminal /;/

    call → name () ; 0:function
    call → name () 0:function
    call → name ( name ) ; 0:function
    call → name ( name ) 0:function
    ");
}

#[test]
fn precedence_applies_to_alternatives() {
    let output = lowered(indoc! {r#"
        {
          "name": "prec",
          "precedences": [[{"type": "STRING", "value": "high"}, {"type": "STRING", "value": "low"}]],
          "rules": {
            "expression": {"type": "CHOICE", "members": [
              {"type": "PREC_LEFT", "value": "low", "content": {"type": "SEQ", "members": [
                {"type": "SYMBOL", "name": "expression"},
                {"type": "STRING", "value": "+"},
                {"type": "SYMBOL", "name": "expression"}
              ]}},
              {"type": "PREC_RIGHT", "value": "high", "content": {"type": "SEQ", "members": [
                {"type": "SYMBOL", "name": "expression"},
                {"type": "STRING", "value": "^"},
                {"type": "SYMBOL", "name": "expression"}
              ]}},
              {"type": "PREC_DYNAMIC", "value": 5, "content": {"type": "STRING", "value": "x"}}
            ]}
          }
        }
    "#});

    insta::assert_snapshot!(output, @r"
    0 end terminal hidden
    1 ERROR terminal named
    2 expression rule named
    3 + terminal /\+/
    4 ^ terminal /\^/
    5 x terminal /x/

    expression → expression + expression [1 Left]
    expression → expression ^ expression [2 Right]
    expression → x
    ");
}

#[test]
fn token_rules_become_single_patterns() {
    let output = lowered(indoc! {r##"
        {
          "name": "tokens",
          "extras": [{"type": "SYMBOL", "name": "comment"}],
          "rules": {
            "file": {"type": "SEQ", "members": [
              {"type": "SYMBOL", "name": "hex"},
              {"type": "IMMEDIATE_TOKEN", "content": {"type": "STRING", "value": "!"}},
              {"type": "STRING", "value": "!"}
            ]},
            "hex": {"type": "TOKEN", "content": {"type": "PREC", "value": 2, "content": {"type": "SEQ", "members": [
              {"type": "STRING", "value": "0x"},
              {"type": "REPEAT1", "content": {"type": "PATTERN", "value": "[0-9a-f]", "flags": "i"}}
            ]}}},
            "comment": {"type": "TOKEN", "content": {"type": "SEQ", "members": [
              {"type": "STRING", "value": "#"},
              {"type": "PATTERN", "value": "[^\\n]*"}
            ]}}
          }
        }
    "##});

    insta::assert_snapshot!(output, @r"
    0 end terminal hidden
    1 ERROR terminal named
    2 file rule named
    3 comment terminal named extra /\#(?:[^\n]*)/
    4 hex terminal named /0x(?:(?i:[0-9a-f]))+/ prec=2
    5 ! terminal /!/ immediate
    6 ! terminal /!/

    file → hex ! !
    ");
}

#[test]
fn unknown_symbol_names_both_rules() {
    let err = compile_err(r#"{"name": "g", "rules": {"a": {"type": "SYMBOL", "name": "b"}}}"#);
    insta::assert_snapshot!(err, @"rule 'a' references undefined symbol 'b'");
}

#[test]
fn empty_rule_other_than_start_is_rejected() {
    let err = compile_err(indoc! {r#"
        {"name": "g", "rules": {
          "a": {"type": "SYMBOL", "name": "b"},
          "b": {"type": "BLANK"}
        }}
    "#});
    insta::assert_snapshot!(err, @"rule 'b' matches the empty string; only the start rule may");
}

#[test]
fn empty_start_rule_is_allowed() {
    let output = lowered(r#"{"name": "g", "rules": {"a": {"type": "REPEAT", "content": {"type": "STRING", "value": "x"}}}}"#);
    insta::assert_snapshot!(output, @r"
    0 end terminal hidden
    1 ERROR terminal named
    2 a rule named
    3 x terminal /x/
    4 a_repeat1 rule hidden

    a_repeat1 → a_repeat1 x
    a_repeat1 → x
    a → a_repeat1
    a → ε
    ");
}

#[test]
fn empty_token_is_rejected() {
    let err = compile_err(indoc! {r#"
        {"name": "g", "rules": {
          "a": {"type": "SEQ", "members": [
            {"type": "STRING", "value": "x"},
            {"type": "TOKEN", "content": {"type": "PATTERN", "value": "y*"}}
          ]}
        }}
    "#});
    insta::assert_snapshot!(err, @"token 'a' matches the empty string");
}

#[test]
fn invalid_pattern_is_rejected() {
    let err = compile_err(r#"{"name": "g", "rules": {"a": {"type": "PATTERN", "value": "("}}}"#);
    assert!(err.starts_with("invalid pattern /(?:()/ in rule 'a'"), "{err}");
}

#[test]
fn unsupported_features_are_rejected() {
    let alias = compile_err(indoc! {r#"
        {"name": "g", "rules": {
          "a": {"type": "ALIAS", "named": true, "value": "b", "content": {"type": "STRING", "value": "x"}}
        }}
    "#});
    assert_eq!(alias, "unsupported ALIAS in rule 'a'");

    let externals = compile_err(indoc! {r#"
        {"name": "g", "externals": [{"type": "SYMBOL", "name": "heredoc"}], "rules": {
          "a": {"type": "STRING", "value": "x"}
        }}
    "#});
    assert_eq!(externals, "unsupported external scanners in rule 'a'");
}

#[test]
fn unknown_named_precedence_is_rejected() {
    let err = compile_err(indoc! {r#"
        {"name": "g", "rules": {
          "a": {"type": "PREC", "value": "missing", "content": {"type": "STRING", "value": "x"}}
        }}
    "#});
    insta::assert_snapshot!(err, @"unknown precedence 'missing' in rule 'a'");
}
