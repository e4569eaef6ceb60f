use super::*;

fn grammar(json: &str) -> Grammar {
    Grammar::from_json(json).unwrap()
}

#[test]
fn hidden_rules() {
    let g = grammar(
        r#"{
            "name": "t",
            "inline": ["inlined"],
            "supertypes": ["expression"],
            "rules": {
                "root": { "type": "SYMBOL", "name": "_item" },
                "_item": { "type": "SYMBOL", "name": "inlined" },
                "inlined": { "type": "SYMBOL", "name": "expression" },
                "expression": { "type": "STRING", "value": "x" }
            }
        }"#,
    );

    assert!(!g.is_hidden_rule("root"));
    assert!(g.is_hidden_rule("_item"));
    assert!(g.is_hidden_rule("inlined"));
    assert!(g.is_hidden_rule("expression"));
}

#[test]
fn lexical_rules_see_through_precedence() {
    let token = Rule::Prec {
        value: Precedence::Integer(1),
        content: Box::new(Rule::Token(Box::new(Rule::Blank))),
    };
    assert!(token.is_lexical());
    assert!(Rule::String("a".into()).is_lexical());
    assert!(!Rule::Seq(vec![Rule::String("a".into())]).is_lexical());
    assert!(!Rule::Symbol("a".into()).is_lexical());
}
