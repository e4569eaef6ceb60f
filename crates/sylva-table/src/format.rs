//! Wire constants shared by the emitter and the loader.

use std::ops::RangeInclusive;

pub const MAGIC: [u8; 4] = *b"SYLT";

/// Format version written by this crate.
pub const VERSION: u32 = 1;

/// Versions the loader accepts.
pub const SUPPORTED_VERSIONS: RangeInclusive<u32> = 1..=VERSION;

/// Every section starts on a 64-byte boundary.
pub const SECTION_ALIGN: usize = 64;

pub const SYMBOL_SIZE: usize = 8;
pub const PRODUCTION_SIZE: usize = 8;
pub const STATE_SIZE: usize = 8;
pub const ACTION_SIZE: usize = 8;
pub const LEX_MODE_SIZE: usize = 8;

/// Bits of the symbol `flags` byte.
pub mod symbol_flags {
    pub const TERMINAL: u8 = 1 << 0;
    pub const NAMED: u8 = 1 << 1;
    pub const VISIBLE: u8 = 1 << 2;
    pub const EXTRA: u8 = 1 << 3;
    /// Token written as a string literal in the grammar.
    pub const LITERAL: u8 = 1 << 4;
    pub const IMMEDIATE: u8 = 1 << 5;
}

/// Values of the action `kind` byte.
pub mod action_kind {
    pub const SHIFT: u8 = 1;
    pub const REDUCE: u8 = 2;
    pub const ACCEPT: u8 = 3;
    pub const GOTO: u8 = 4;
}
