use std::sync::Arc;

use sylva_runtime::Parser;

use super::*;

#[test]
fn can_load_grammar() {
    let table = veryl().unwrap();
    assert_eq!(table.name(), "veryl");
    assert!(table.state_count() > 0);
}

#[test]
fn loads_once() {
    let first = veryl().unwrap();
    let second = veryl().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn bundled_grammar_parses() {
    let mut parser = Parser::new(veryl().unwrap());
    let tree = parser.parse(" hello\n", None).unwrap();
    assert!(!tree.has_error());
    assert_eq!(tree.to_sexp(), "(source_file)");

    let tree = parser.parse("goodbye", None).unwrap();
    assert!(tree.has_error());
}

#[test]
fn lookup_by_name() {
    assert_eq!(from_name("Veryl").unwrap().name, "veryl");
    assert!(from_name("unknown").is_none());
    assert_eq!(all().len(), 1);
    assert_eq!(all()[0].load().unwrap().name(), "veryl");
}
