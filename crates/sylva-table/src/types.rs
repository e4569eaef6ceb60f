//! Decoded table entries.

use regex_automata::dfa::sparse::DFA;

use crate::ids::{FieldId, ProductionId, StateId, Symbol};

/// Metadata for one grammar symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: String,
    pub terminal: bool,
    /// Named symbols come from grammar rules; anonymous ones from literals.
    pub named: bool,
    /// Hidden symbols never appear as nodes.
    pub visible: bool,
    pub extra: bool,
    pub literal: bool,
    /// Only matches directly after the previous token, without padding.
    pub immediate: bool,
    pub lexeme: Option<u16>,
    pub lex_prec: i16,
}

impl SymbolInfo {
    /// Terminal that is consumed as padding instead of producing a node.
    pub fn is_trivia(&self) -> bool {
        self.terminal && self.extra && !self.visible
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
    Goto(StateId),
}

/// A grammar production as seen by the parser: which symbol it builds, how
/// many stack entries it pops, and the field name of each popped child.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    pub lhs: Symbol,
    pub fields: Box<[Option<FieldId>]>,
}

impl Production {
    pub fn child_count(&self) -> usize {
        self.fields.len()
    }
}

/// Token rule compiled to an anchored DFA.
#[derive(Clone, Debug)]
pub struct Lexeme {
    pub(crate) pattern: String,
    pub(crate) dfa: DFA<Vec<u8>>,
}

impl Lexeme {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn dfa(&self) -> &DFA<Vec<u8>> {
        &self.dfa
    }
}
