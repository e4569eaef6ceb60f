use indoc::indoc;
use sylva_table::{Action, Symbol};

use crate::test_utils::{actions_on, binary_grammar, compile_err, compile_ok};

#[test]
fn left_associative_reduces_on_same_operator() {
    let table = compile_ok(&binary_grammar("PREC_LEFT"));
    let minus = table.symbol_for_name("-", false).unwrap();

    assert_eq!(
        actions_on(&table, minus),
        [Action::Shift(3), Action::Reduce(0), Action::Reduce(1)]
    );
}

#[test]
fn right_associative_shifts_on_same_operator() {
    let table = compile_ok(&binary_grammar("PREC_RIGHT"));
    let minus = table.symbol_for_name("-", false).unwrap();

    assert_eq!(
        actions_on(&table, minus),
        [Action::Shift(3), Action::Reduce(0), Action::Shift(3)]
    );
}

#[test]
fn missing_precedence_is_a_conflict() {
    insta::assert_snapshot!(compile_err(&binary_grammar("")), @"unresolved shift/reduce conflict on '-': reduce expression → expression - expression | shift expression → expression - expression");
}

#[test]
fn precedence_without_associativity_is_a_conflict() {
    let err = compile_err(&binary_grammar("PREC"));
    assert!(err.starts_with("unresolved shift/reduce conflict on '-'"), "{err}");
}

#[test]
fn higher_precedence_operator_shifts() {
    let table = compile_ok(indoc! {r#"
        {
          "name": "ops",
          "rules": {
            "expression": {
              "type": "CHOICE",
              "members": [
                {"type": "PATTERN", "value": "[0-9]"},
                {"type": "PREC_LEFT", "value": 1, "content": {"type": "SEQ", "members": [
                  {"type": "SYMBOL", "name": "expression"},
                  {"type": "STRING", "value": "+"},
                  {"type": "SYMBOL", "name": "expression"}
                ]}},
                {"type": "PREC_LEFT", "value": 2, "content": {"type": "SEQ", "members": [
                  {"type": "SYMBOL", "name": "expression"},
                  {"type": "STRING", "value": "*"},
                  {"type": "SYMBOL", "name": "expression"}
                ]}}
              ]
            }
          }
        }
    "#});
    let plus = table.symbol_for_name("+", false).unwrap();
    let star = table.symbol_for_name("*", false).unwrap();

    // After `e + e`, a `*` shifts and a `+` reduces.
    let sum = (0..table.state_count() as u16)
        .find(|&state| {
            matches!(table.action(state, Symbol::END), Some(Action::Reduce(p))
                if table.production(p).unwrap().child_count() == 3
                    && table.action(state, plus) == Some(Action::Reduce(p))
                    && table.production(p).unwrap().lhs == table.start_symbol()
                    && matches!(table.action(state, star), Some(Action::Shift(_))))
        });
    assert!(sum.is_some());

    // After `e * e`, both operators reduce.
    let product = (0..table.state_count() as u16).find(|&state| {
        matches!(table.action(state, plus), Some(Action::Reduce(_)))
            && table.action(state, plus) == table.action(state, star)
            && table.action(state, plus) != Some(Action::Reduce(0))
    });
    assert!(product.is_some());
}

#[test]
fn reduce_reduce_conflict_is_reported() {
    let json = indoc! {r#"
        {
          "name": "ambiguous",
          "rules": {
            "start": {"type": "CHOICE", "members": [
              {"type": "SYMBOL", "name": "a"},
              {"type": "SYMBOL", "name": "b"}
            ]},
            "a": {"type": "SEQ", "members": [{"type": "STRING", "value": "x"}]},
            "b": {"type": "SEQ", "members": [{"type": "STRING", "value": "x"}]}
          }
        }
    "#};
    insta::assert_snapshot!(compile_err(json), @"unresolved reduce/reduce conflict on 'end': reduce a → x | reduce b → x");
}

#[test]
fn reduce_reduce_resolved_by_precedence() {
    let table = compile_ok(indoc! {r#"
        {
          "name": "preferred",
          "rules": {
            "start": {"type": "CHOICE", "members": [
              {"type": "SYMBOL", "name": "a"},
              {"type": "SYMBOL", "name": "b"}
            ]},
            "a": {"type": "SEQ", "members": [{"type": "STRING", "value": "x"}]},
            "b": {"type": "PREC", "value": 1, "content":
              {"type": "SEQ", "members": [{"type": "STRING", "value": "x"}]}}
          }
        }
    "#});
    let b = table.symbol_for_name("b", true).unwrap();

    let reductions: Vec<Symbol> = actions_on(&table, Symbol::END)
        .into_iter()
        .filter_map(|action| match action {
            Action::Reduce(p) => Some(table.production(p).unwrap().lhs),
            _ => None,
        })
        .filter(|&lhs| lhs != table.start_symbol())
        .collect();
    assert_eq!(reductions, [b]);
}

#[test]
fn lex_modes_follow_expected_terminals() {
    let table = compile_ok(&binary_grammar("PREC_LEFT"));
    let name = |symbols: &[Symbol]| -> Vec<String> {
        symbols
            .iter()
            .map(|&s| table.symbol_name(s).to_owned())
            .collect()
    };

    assert_eq!(table.lex_mode_count(), 3);
    assert_eq!(name(table.lex_mode_symbols(0)), [r"\s", "number", "-"]);
    assert_eq!(name(table.lex_mode_symbols(table.lex_mode(0))), [r"\s", "number"]);
    assert_eq!(name(table.lex_mode_symbols(table.lex_mode(1))), [r"\s", "-"]);
    assert_eq!(table.lex_mode(1), table.lex_mode(4));
}

#[test]
fn start_state_accepts_after_start_symbol() {
    let table = compile_ok(&binary_grammar("PREC_LEFT"));
    let goto = table.goto(0, table.start_symbol()).unwrap();

    assert_eq!(table.action(goto, Symbol::END), Some(Action::Accept));
}
