use crate::format::{MAGIC, SECTION_ALIGN, VERSION};
use crate::header::Header;

#[test]
fn header_size() {
    assert_eq!(std::mem::size_of::<Header>(), 64);
    assert_eq!(std::mem::align_of::<Header>(), 64);
}

#[test]
fn header_bytes_keep_field_positions() {
    let header = Header {
        checksum: 0xDEAD_BEEF,
        total_size: 4096,
        actions_count: 70_000,
        symbols_count: 12,
        states_count: 40,
        start_symbol: 9,
        ..Default::default()
    };

    let bytes = header.to_bytes();
    assert_eq!(&bytes[0..4], &MAGIC);
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), VERSION);
    assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 70_000);
    assert_eq!(u16::from_le_bytes([bytes[52], bytes[53]]), 9);
    assert_eq!(Header::from_bytes(&bytes), header);
}

#[test]
fn version_range() {
    let mut header = Header::default();
    assert!(header.validate_magic());
    assert!(header.validate_version());

    header.version = 0;
    assert!(!header.validate_version());
    header.version = VERSION + 1;
    assert!(!header.validate_version());

    header.magic = *b"PTKQ";
    assert!(!header.validate_magic());
}

#[test]
fn empty_sections_collapse() {
    let offsets = Header::default().compute_offsets();

    assert_eq!(offsets.str_blob, 64);
    assert_eq!(offsets.regex_blob, 64);
    assert_eq!(offsets.str_table, 64);
    // String table sentinel (4 bytes) pads to one section.
    assert_eq!(offsets.regex_table, 128);
    // Regex table sentinel (8 bytes).
    assert_eq!(offsets.symbols, 192);
    assert_eq!(offsets.end, 192);
}

#[test]
fn sections_are_aligned() {
    let header = Header {
        str_blob_size: 100,
        regex_blob_size: 300,
        str_table_count: 10,
        regex_table_count: 3,
        symbols_count: 9,
        fields_count: 2,
        productions_count: 7,
        production_fields_count: 15,
        states_count: 20,
        actions_count: 55,
        lex_modes_count: 4,
        lex_mode_symbols_count: 19,
        ..Default::default()
    };
    let o = header.compute_offsets();

    for offset in [
        o.str_blob,
        o.regex_blob,
        o.str_table,
        o.regex_table,
        o.symbols,
        o.fields,
        o.productions,
        o.production_fields,
        o.states,
        o.actions,
        o.lex_modes,
        o.lex_mode_symbols,
        o.end,
    ] {
        assert_eq!(offset % SECTION_ALIGN, 0);
    }

    assert_eq!(o.regex_blob, 192);
    assert_eq!(o.str_table, 512);
    assert_eq!(o.symbols - o.regex_table, 64);
    assert!(o.actions + 55 * 8 <= o.lex_modes);
}
