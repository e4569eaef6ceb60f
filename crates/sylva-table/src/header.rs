//! Grammar table header (64 bytes).
//!
//! Section offsets are not stored; they follow from the counts. Order:
//! StringBlob → RegexBlob → StringTable → RegexTable → Symbols → Fields →
//! Productions → ProductionFields → States → Actions → LexModes →
//! LexModeSymbols

use crate::format::{
    ACTION_SIZE, LEX_MODE_SIZE, MAGIC, PRODUCTION_SIZE, SECTION_ALIGN, STATE_SIZE, SYMBOL_SIZE,
    SUPPORTED_VERSIONS, VERSION,
};

/// First 64 bytes of a grammar table.
///
/// - 0-23: identity and blob sizes
/// - 24-35: large counts (`u32`)
/// - 36-49: small counts (`u16`), in section order
/// - 50-53: grammar name and start symbol
/// - 54-63: reserved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    /// CRC32 of everything after the header.
    pub checksum: u32,
    pub total_size: u32,
    pub str_blob_size: u32,
    pub regex_blob_size: u32,

    pub actions_count: u32,
    pub production_fields_count: u32,
    pub lex_mode_symbols_count: u32,

    pub str_table_count: u16,
    /// Includes the reserved entry 0.
    pub regex_table_count: u16,
    pub symbols_count: u16,
    pub fields_count: u16,
    pub productions_count: u16,
    pub states_count: u16,
    pub lex_modes_count: u16,

    pub name: u16,
    pub start_symbol: u16,

    pub _reserved: [u8; 10],
}

const _: () = assert!(std::mem::size_of::<Header>() == 64);

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            str_blob_size: 0,
            regex_blob_size: 0,
            actions_count: 0,
            production_fields_count: 0,
            lex_mode_symbols_count: 0,
            str_table_count: 0,
            regex_table_count: 0,
            symbols_count: 0,
            fields_count: 0,
            productions_count: 0,
            states_count: 0,
            lex_modes_count: 0,
            name: 0,
            start_symbol: 0,
            _reserved: [0; 10],
        }
    }
}

/// Byte offsets of every section, derived from header counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionOffsets {
    pub str_blob: usize,
    pub regex_blob: usize,
    pub str_table: usize,
    pub regex_table: usize,
    pub symbols: usize,
    pub fields: usize,
    pub productions: usize,
    pub production_fields: usize,
    pub states: usize,
    pub actions: usize,
    pub lex_modes: usize,
    pub lex_mode_symbols: usize,
    /// One past the last section, padded. Equals `total_size` in a valid table.
    pub end: usize,
}

impl Header {
    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        let mut reserved = [0u8; 10];
        reserved.copy_from_slice(&bytes[54..64]);

        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32_at(bytes, 4),
            checksum: u32_at(bytes, 8),
            total_size: u32_at(bytes, 12),
            str_blob_size: u32_at(bytes, 16),
            regex_blob_size: u32_at(bytes, 20),
            actions_count: u32_at(bytes, 24),
            production_fields_count: u32_at(bytes, 28),
            lex_mode_symbols_count: u32_at(bytes, 32),
            str_table_count: u16_at(bytes, 36),
            regex_table_count: u16_at(bytes, 38),
            symbols_count: u16_at(bytes, 40),
            fields_count: u16_at(bytes, 42),
            productions_count: u16_at(bytes, 44),
            states_count: u16_at(bytes, 46),
            lex_modes_count: u16_at(bytes, 48),
            name: u16_at(bytes, 50),
            start_symbol: u16_at(bytes, 52),
            _reserved: reserved,
        }
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.str_blob_size.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.regex_blob_size.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.actions_count.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.production_fields_count.to_le_bytes());
        bytes[32..36].copy_from_slice(&self.lex_mode_symbols_count.to_le_bytes());
        bytes[36..38].copy_from_slice(&self.str_table_count.to_le_bytes());
        bytes[38..40].copy_from_slice(&self.regex_table_count.to_le_bytes());
        bytes[40..42].copy_from_slice(&self.symbols_count.to_le_bytes());
        bytes[42..44].copy_from_slice(&self.fields_count.to_le_bytes());
        bytes[44..46].copy_from_slice(&self.productions_count.to_le_bytes());
        bytes[46..48].copy_from_slice(&self.states_count.to_le_bytes());
        bytes[48..50].copy_from_slice(&self.lex_modes_count.to_le_bytes());
        bytes[50..52].copy_from_slice(&self.name.to_le_bytes());
        bytes[52..54].copy_from_slice(&self.start_symbol.to_le_bytes());
        bytes[54..64].copy_from_slice(&self._reserved);
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        SUPPORTED_VERSIONS.contains(&self.version)
    }

    /// Compute section offsets from counts and blob sizes.
    ///
    /// Arithmetic is done in `usize` on widened counts, so a hostile header
    /// cannot wrap around; it only produces an `end` that fails the size check.
    pub fn compute_offsets(&self) -> SectionOffsets {
        let str_blob = SECTION_ALIGN;
        let regex_blob = align_up(str_blob + self.str_blob_size as usize);
        let str_table = align_up(regex_blob + self.regex_blob_size as usize);
        let regex_table = align_up(str_table + (self.str_table_count as usize + 1) * 4);
        let symbols = align_up(regex_table + (self.regex_table_count as usize + 1) * 8);
        let fields = align_up(symbols + self.symbols_count as usize * SYMBOL_SIZE);
        let productions = align_up(fields + self.fields_count as usize * 2);
        let production_fields =
            align_up(productions + self.productions_count as usize * PRODUCTION_SIZE);
        let states = align_up(production_fields + self.production_fields_count as usize * 2);
        let actions = align_up(states + self.states_count as usize * STATE_SIZE);
        let lex_modes = align_up(actions + self.actions_count as usize * ACTION_SIZE);
        let lex_mode_symbols = align_up(lex_modes + self.lex_modes_count as usize * LEX_MODE_SIZE);
        let end = align_up(lex_mode_symbols + self.lex_mode_symbols_count as usize * 2);

        SectionOffsets {
            str_blob,
            regex_blob,
            str_table,
            regex_table,
            symbols,
            fields,
            productions,
            production_fields,
            states,
            actions,
            lex_modes,
            lex_mode_symbols,
            end,
        }
    }
}

fn align_up(value: usize) -> usize {
    value.div_ceil(SECTION_ALIGN) * SECTION_ALIGN
}

#[inline]
pub(crate) fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
pub(crate) fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
