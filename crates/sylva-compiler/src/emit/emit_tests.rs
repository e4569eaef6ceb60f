use sylva_core::Colors;
use sylva_table::{GrammarTable, LoadError, dump};

use crate::test_utils::compile_ok;

const HELLO: &str = r#"{"name": "hello", "rules": {"source_file": {"type": "STRING", "value": "hello"}}}"#;

fn hello_bytes() -> Vec<u8> {
    crate::compile_json(HELLO).unwrap()
}

#[test]
fn dump_of_single_token_grammar() {
    let table = compile_ok(HELLO);

    insta::assert_snapshot!(dump(&table, Colors::OFF), @r#"
    [grammar]
    name    = hello
    version = 1
    start   = source_file

    [symbols]
    0 end terminal hidden
    1 ERROR terminal named
    2 source_file rule named
    3 "hello" terminal /hello/

    [productions]
    0 source_file (1 children)

    [states]
    0 lex mode 0
        source_file → goto 1
        "hello" → shift 2
    1 lex mode 1
        end → accept
    2 lex mode 1
        end → reduce 0

    [lex_modes]
    0 "hello"
    1
    "#);
}

#[test]
fn output_is_deterministic() {
    assert_eq!(hello_bytes(), hello_bytes());
}

#[test]
fn sections_are_aligned() {
    let bytes = hello_bytes();
    assert_eq!(bytes.len() % 64, 0);
    assert_eq!(&bytes[0..4], b"SYLT");
}

#[test]
fn fields_survive_the_round_trip() {
    let table = compile_ok(
        r#"{"name": "f", "rules": {"pair": {"type": "SEQ", "members": [
            {"type": "FIELD", "name": "key", "content": {"type": "STRING", "value": "k"}},
            {"type": "STRING", "value": "="},
            {"type": "FIELD", "name": "value", "content": {"type": "STRING", "value": "v"}}
        ]}}}"#,
    );

    let key = table.field_id_for_name("key").unwrap();
    let value = table.field_id_for_name("value").unwrap();
    let production = table.production(0).unwrap();
    assert_eq!(production.lhs, table.start_symbol());
    assert_eq!(&*production.fields, &[Some(key), None, Some(value)]);
    assert_eq!(table.field_name(value), Some("value"));
}

#[test]
fn flipped_byte_fails_checksum() {
    let mut bytes = hello_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;

    match GrammarTable::load(&bytes) {
        Err(LoadError::Corrupt(msg)) => assert_eq!(msg, "checksum mismatch"),
        other => panic!("expected checksum mismatch, got {other:?}"),
    }
}

#[test]
fn truncated_table_is_rejected() {
    let bytes = hello_bytes();
    let err = GrammarTable::load(&bytes[..bytes.len() - 64]).unwrap_err();
    assert!(err.to_string().contains("size mismatch"), "{err}");
}

#[test]
fn newer_version_is_incompatible() {
    let mut bytes = hello_bytes();
    bytes[4..8].copy_from_slice(&2u32.to_le_bytes());

    insta::assert_snapshot!(
        GrammarTable::load(&bytes).unwrap_err(),
        @"incompatible grammar table version 2 (supported: 1 to 1)"
    );
}
