use super::string_table::StringTableBuilder;

#[test]
fn intern_deduplicates() {
    let mut builder = StringTableBuilder::new();

    let a = builder.intern("expression").unwrap();
    let b = builder.intern("identifier").unwrap();
    let c = builder.intern("expression").unwrap();

    assert_eq!(a, 0);
    assert_eq!(b, 1);
    assert_eq!(c, a);
    assert_eq!(builder.len(), 2);
}

#[test]
fn emit_offsets_delimit_strings() {
    let mut builder = StringTableBuilder::new();
    builder.intern("ab").unwrap();
    builder.intern("").unwrap();
    builder.intern("cde").unwrap();

    let (blob, table) = builder.emit();
    assert_eq!(blob, b"abcde");

    let offsets: Vec<u32> = table
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert_eq!(offsets, [0, 2, 2, 5]);
}
