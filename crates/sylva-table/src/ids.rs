use std::num::NonZeroU16;

/// Grammar symbol, terminal or non-terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Symbol(pub u16);

impl Symbol {
    /// End of input.
    pub const END: Symbol = Symbol(0);
    /// Error nodes and unlexable characters.
    pub const ERROR: Symbol = Symbol(1);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub type StateId = u16;
pub type ProductionId = u16;
pub type LexModeId = u16;
pub type StringId = u16;

/// Field ids start at 1; 0 means "no field" on the wire.
pub type FieldId = NonZeroU16;

/// Lex mode containing every terminal, used during error recovery.
pub const ERROR_LEX_MODE: LexModeId = 0;
