//! Loading and querying grammar tables.

use std::fmt;
use std::num::NonZeroU16;
use std::ops::Range;
use std::path::Path;

use regex_automata::dfa::sparse::DFA;

use crate::format::{
    ACTION_SIZE, LEX_MODE_SIZE, MAGIC, PRODUCTION_SIZE, STATE_SIZE, SUPPORTED_VERSIONS,
    SYMBOL_SIZE, action_kind, symbol_flags,
};
use crate::header::{Header, SectionOffsets, u16_at, u32_at};
use crate::ids::{ERROR_LEX_MODE, FieldId, LexModeId, ProductionId, StateId, Symbol};
use crate::types::{Action, Lexeme, Production, SymbolInfo};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("incompatible grammar table version {found} (supported: {min} to {max})")]
    IncompatibleVersion { found: u32, min: u32, max: u32 },

    #[error("corrupt grammar table: {0}")]
    Corrupt(String),

    #[error("failed to read grammar table: {0}")]
    Io(#[from] std::io::Error),
}

fn corrupt(reason: impl Into<String>) -> LoadError {
    LoadError::Corrupt(reason.into())
}

#[derive(Clone, Copy, Debug)]
struct StateEntry {
    actions_start: u32,
    actions_len: u16,
    lex_mode: LexModeId,
}

impl StateEntry {
    fn actions(&self) -> Range<usize> {
        let start = self.actions_start as usize;
        start..start + self.actions_len as usize
    }
}

/// An immutable, validated grammar table.
///
/// Every index stored in a loaded table has been bounds-checked, so lookups
/// with ids obtained from the table itself never fail.
pub struct GrammarTable {
    version: u32,
    name: String,
    start_symbol: Symbol,
    symbols: Vec<SymbolInfo>,
    fields: Vec<String>,
    productions: Vec<Production>,
    states: Vec<StateEntry>,
    actions: Vec<(Symbol, Action)>,
    lex_modes: Vec<Range<usize>>,
    lex_mode_symbols: Vec<Symbol>,
    /// Indexed by regex id; entry 0 is reserved.
    lexemes: Vec<Option<Lexeme>>,
}

impl GrammarTable {
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        if bytes.len() < 8 {
            return Err(corrupt(format!("{} bytes is too short for a header", bytes.len())));
        }
        if bytes[0..4] != MAGIC {
            return Err(corrupt("invalid magic: expected SYLT"));
        }
        let version = u32_at(bytes, 4);
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(LoadError::IncompatibleVersion {
                found: version,
                min: *SUPPORTED_VERSIONS.start(),
                max: *SUPPORTED_VERSIONS.end(),
            });
        }

        let Some(head) = bytes.first_chunk::<64>() else {
            return Err(corrupt(format!("{} bytes is too short for a header", bytes.len())));
        };
        let header = Header::from_bytes(head);
        if header.total_size as usize != bytes.len() {
            return Err(corrupt(format!(
                "size mismatch: header says {} bytes, got {}",
                header.total_size,
                bytes.len()
            )));
        }

        let offsets = header.compute_offsets();
        if offsets.end != bytes.len() {
            return Err(corrupt(format!(
                "section layout needs {} bytes, table has {}",
                offsets.end,
                bytes.len()
            )));
        }

        if crc32fast::hash(&bytes[64..]) != header.checksum {
            return Err(corrupt("checksum mismatch"));
        }

        Decoder {
            bytes,
            header,
            offsets,
        }
        .decode()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_symbol(&self) -> Symbol {
        self.start_symbol
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbol(&self, symbol: Symbol) -> Option<&SymbolInfo> {
        self.symbols.get(symbol.index())
    }

    pub fn symbols(&self) -> impl Iterator<Item = (Symbol, &SymbolInfo)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, info)| (Symbol(i as u16), info))
    }

    /// Name of a symbol, or `""` when the id is out of range.
    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        self.symbol(symbol).map_or("", |info| info.name.as_str())
    }

    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol> {
        self.symbols()
            .find(|(_, info)| info.name == name && info.named == named)
            .map(|(symbol, _)| symbol)
    }

    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        self.symbol(symbol).is_some_and(|info| info.terminal)
    }

    pub fn is_named(&self, symbol: Symbol) -> bool {
        self.symbol(symbol).is_some_and(|info| info.named)
    }

    pub fn is_visible(&self, symbol: Symbol) -> bool {
        self.symbol(symbol).is_some_and(|info| info.visible)
    }

    pub fn is_extra(&self, symbol: Symbol) -> bool {
        self.symbol(symbol).is_some_and(|info| info.extra)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_name(&self, field: FieldId) -> Option<&str> {
        self.fields.get(field.get() as usize - 1).map(String::as_str)
    }

    pub fn field_id_for_name(&self, name: &str) -> Option<FieldId> {
        let index = self.fields.iter().position(|f| f == name)?;
        NonZeroU16::new(index as u16 + 1)
    }

    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    pub fn production(&self, id: ProductionId) -> Option<&Production> {
        self.productions.get(id as usize)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// All actions and gotos of a state, sorted by symbol.
    pub fn actions(&self, state: StateId) -> &[(Symbol, Action)] {
        match self.states.get(state as usize) {
            Some(entry) => &self.actions[entry.actions()],
            None => &[],
        }
    }

    /// Parse action for a terminal lookahead. `None` is a syntax error.
    pub fn action(&self, state: StateId, symbol: Symbol) -> Option<Action> {
        match self.lookup(state, symbol)? {
            Action::Goto(_) => None,
            action => Some(action),
        }
    }

    /// Target state after reducing to `symbol` with `state` on top.
    pub fn goto(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        match self.lookup(state, symbol)? {
            Action::Goto(target) => Some(target),
            _ => None,
        }
    }

    fn lookup(&self, state: StateId, symbol: Symbol) -> Option<Action> {
        let actions = self.actions(state);
        let index = actions.binary_search_by_key(&symbol, |&(s, _)| s).ok()?;
        Some(actions[index].1)
    }

    pub fn lex_mode(&self, state: StateId) -> LexModeId {
        self.states
            .get(state as usize)
            .map_or(ERROR_LEX_MODE, |entry| entry.lex_mode)
    }

    pub fn lex_mode_count(&self) -> usize {
        self.lex_modes.len()
    }

    /// Terminals the lexer tries in a mode, extras included.
    pub fn lex_mode_symbols(&self, mode: LexModeId) -> &[Symbol] {
        match self.lex_modes.get(mode as usize) {
            Some(range) => &self.lex_mode_symbols[range.clone()],
            None => &[],
        }
    }

    pub fn lexeme(&self, symbol: Symbol) -> Option<&Lexeme> {
        let id = self.symbol(symbol)?.lexeme?;
        self.lexemes.get(id as usize)?.as_ref()
    }
}

impl fmt::Debug for GrammarTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarTable")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("symbols", &self.symbols.len())
            .field("states", &self.states.len())
            .field("productions", &self.productions.len())
            .finish()
    }
}

/// Section-by-section decoding. Each step validates the indices it reads
/// against the sections decoded before it.
struct Decoder<'a> {
    bytes: &'a [u8],
    header: Header,
    offsets: SectionOffsets,
}

impl Decoder<'_> {
    fn decode(self) -> Result<GrammarTable, LoadError> {
        let strings = self.strings()?;
        let lexemes = self.lexemes(&strings)?;
        let symbols = self.symbols(&strings, &lexemes)?;
        let fields = self.fields(&strings)?;
        let productions = self.productions(&symbols, fields.len())?;
        let states = self.states()?;
        let actions = self.actions(&symbols, &states, productions.len())?;
        let (lex_modes, lex_mode_symbols) = self.lex_modes(&symbols)?;

        let name = string(&strings, self.header.name)?.to_owned();
        let start_symbol = Symbol(self.header.start_symbol);
        match symbols.get(start_symbol.index()) {
            Some(info) if !info.terminal => {}
            _ => return Err(corrupt("start symbol is not a non-terminal")),
        }

        Ok(GrammarTable {
            version: self.header.version,
            name,
            start_symbol,
            symbols,
            fields,
            productions,
            states,
            actions,
            lex_modes,
            lex_mode_symbols,
            lexemes,
        })
    }

    fn strings(&self) -> Result<Vec<&str>, LoadError> {
        let count = self.header.str_table_count as usize;
        let blob_size = self.header.str_blob_size as usize;
        let blob = &self.bytes[self.offsets.str_blob..self.offsets.str_blob + blob_size];

        let mut strings = Vec::with_capacity(count);
        let mut start = u32_at(self.bytes, self.offsets.str_table) as usize;
        for i in 0..count {
            let end = u32_at(self.bytes, self.offsets.str_table + (i + 1) * 4) as usize;
            if start > end || end > blob_size {
                return Err(corrupt(format!("string {i} is out of bounds")));
            }
            let s = std::str::from_utf8(&blob[start..end])
                .map_err(|_| corrupt(format!("string {i} is not UTF-8")))?;
            strings.push(s);
            start = end;
        }
        Ok(strings)
    }

    fn lexemes(&self, strings: &[&str]) -> Result<Vec<Option<Lexeme>>, LoadError> {
        let count = self.header.regex_table_count as usize;
        let blob_size = self.header.regex_blob_size as usize;
        let blob = &self.bytes[self.offsets.regex_blob..self.offsets.regex_blob + blob_size];
        let entry = |i: usize| {
            let at = self.offsets.regex_table + i * 8;
            (u16_at(self.bytes, at), u32_at(self.bytes, at + 4) as usize)
        };

        let mut lexemes = Vec::with_capacity(count);
        for i in 0..count {
            if i == 0 {
                lexemes.push(None);
                continue;
            }
            let (pattern, start) = entry(i);
            let (_, end) = entry(i + 1);
            if start > end || end > blob_size {
                return Err(corrupt(format!("regex {i} is out of bounds")));
            }
            let pattern = string(strings, pattern)?.to_owned();
            let dfa = DFA::from_bytes(&blob[start..end])
                .map_err(|e| corrupt(format!("regex {i} ({pattern}): {e}")))?
                .0
                .to_owned();
            lexemes.push(Some(Lexeme { pattern, dfa }));
        }
        Ok(lexemes)
    }

    fn symbols(
        &self,
        strings: &[&str],
        lexemes: &[Option<Lexeme>],
    ) -> Result<Vec<SymbolInfo>, LoadError> {
        let count = self.header.symbols_count as usize;
        if count < 2 {
            return Err(corrupt("missing built-in symbols"));
        }

        let mut symbols = Vec::with_capacity(count);
        for i in 0..count {
            let at = self.offsets.symbols + i * SYMBOL_SIZE;
            let flags = self.bytes[at + 2];
            let terminal = flags & symbol_flags::TERMINAL != 0;
            let lexeme = match u16_at(self.bytes, at + 4) {
                0 => None,
                id if terminal && lexemes.get(id as usize).is_some_and(Option::is_some) => {
                    Some(id)
                }
                id => return Err(corrupt(format!("symbol {i} has invalid regex {id}"))),
            };
            symbols.push(SymbolInfo {
                name: string(strings, u16_at(self.bytes, at))?.to_owned(),
                terminal,
                named: flags & symbol_flags::NAMED != 0,
                visible: flags & symbol_flags::VISIBLE != 0,
                extra: flags & symbol_flags::EXTRA != 0,
                literal: flags & symbol_flags::LITERAL != 0,
                immediate: flags & symbol_flags::IMMEDIATE != 0,
                lexeme,
                lex_prec: u16_at(self.bytes, at + 6) as i16,
            });
        }

        if !symbols[Symbol::END.index()].terminal || !symbols[Symbol::ERROR.index()].terminal {
            return Err(corrupt("built-in symbols must be terminals"));
        }
        Ok(symbols)
    }

    fn fields(&self, strings: &[&str]) -> Result<Vec<String>, LoadError> {
        (0..self.header.fields_count as usize)
            .map(|i| {
                let id = u16_at(self.bytes, self.offsets.fields + i * 2);
                string(strings, id).map(str::to_owned)
            })
            .collect()
    }

    fn productions(
        &self,
        symbols: &[SymbolInfo],
        field_count: usize,
    ) -> Result<Vec<Production>, LoadError> {
        let fields_total = self.header.production_fields_count as usize;
        let mut productions = Vec::with_capacity(self.header.productions_count as usize);

        for i in 0..self.header.productions_count as usize {
            let at = self.offsets.productions + i * PRODUCTION_SIZE;
            let lhs = Symbol(u16_at(self.bytes, at));
            let child_count = u16_at(self.bytes, at + 2) as usize;
            let fields_start = u32_at(self.bytes, at + 4) as usize;

            if symbols.get(lhs.index()).is_none_or(|info| info.terminal) {
                return Err(corrupt(format!("production {i} reduces to a terminal")));
            }
            if fields_start + child_count > fields_total {
                return Err(corrupt(format!("production {i} fields are out of bounds")));
            }

            let fields = (0..child_count)
                .map(|c| {
                    let raw = u16_at(self.bytes, self.offsets.production_fields + (fields_start + c) * 2);
                    if raw as usize > field_count {
                        return Err(corrupt(format!("production {i} has invalid field {raw}")));
                    }
                    Ok(NonZeroU16::new(raw))
                })
                .collect::<Result<Box<[_]>, _>>()?;

            productions.push(Production { lhs, fields });
        }
        Ok(productions)
    }

    fn states(&self) -> Result<Vec<StateEntry>, LoadError> {
        let count = self.header.states_count as usize;
        if count == 0 {
            return Err(corrupt("table has no parse states"));
        }

        let mut states = Vec::with_capacity(count);
        for i in 0..count {
            let at = self.offsets.states + i * STATE_SIZE;
            let entry = StateEntry {
                actions_start: u32_at(self.bytes, at),
                actions_len: u16_at(self.bytes, at + 4),
                lex_mode: u16_at(self.bytes, at + 6),
            };
            if entry.actions().end > self.header.actions_count as usize {
                return Err(corrupt(format!("state {i} actions are out of bounds")));
            }
            if entry.lex_mode >= self.header.lex_modes_count {
                return Err(corrupt(format!("state {i} has invalid lex mode")));
            }
            states.push(entry);
        }
        Ok(states)
    }

    fn actions(
        &self,
        symbols: &[SymbolInfo],
        states: &[StateEntry],
        production_count: usize,
    ) -> Result<Vec<(Symbol, Action)>, LoadError> {
        let state_count = states.len();
        let mut actions = Vec::with_capacity(self.header.actions_count as usize);

        for i in 0..self.header.actions_count as usize {
            let at = self.offsets.actions + i * ACTION_SIZE;
            let symbol = Symbol(u16_at(self.bytes, at));
            let value = u16_at(self.bytes, at + 4);
            let Some(info) = symbols.get(symbol.index()) else {
                return Err(corrupt(format!("action {i} has invalid symbol")));
            };

            let action = match self.bytes[at + 2] {
                action_kind::SHIFT if info.terminal && (value as usize) < state_count => {
                    Action::Shift(value)
                }
                action_kind::REDUCE if info.terminal && (value as usize) < production_count => {
                    Action::Reduce(value)
                }
                action_kind::ACCEPT if symbol == Symbol::END => Action::Accept,
                action_kind::GOTO if !info.terminal && (value as usize) < state_count => {
                    Action::Goto(value)
                }
                kind => return Err(corrupt(format!("action {i} (kind {kind}) is invalid"))),
            };
            actions.push((symbol, action));
        }

        for (i, state) in states.iter().enumerate() {
            let sorted = actions[state.actions()]
                .windows(2)
                .all(|pair| pair[0].0 < pair[1].0);
            if !sorted {
                return Err(corrupt(format!("state {i} actions are not sorted")));
            }
        }
        Ok(actions)
    }

    fn lex_modes(&self, symbols: &[SymbolInfo]) -> Result<(Vec<Range<usize>>, Vec<Symbol>), LoadError> {
        let total = self.header.lex_mode_symbols_count as usize;
        let lex_mode_symbols = (0..total)
            .map(|i| {
                let symbol = Symbol(u16_at(self.bytes, self.offsets.lex_mode_symbols + i * 2));
                match symbols.get(symbol.index()) {
                    Some(info) if info.terminal => Ok(symbol),
                    _ => Err(corrupt(format!("lex mode entry {i} is not a terminal"))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut lex_modes = Vec::with_capacity(self.header.lex_modes_count as usize);
        for i in 0..self.header.lex_modes_count as usize {
            let at = self.offsets.lex_modes + i * LEX_MODE_SIZE;
            let start = u32_at(self.bytes, at) as usize;
            let end = start + u16_at(self.bytes, at + 4) as usize;
            if end > total {
                return Err(corrupt(format!("lex mode {i} is out of bounds")));
            }
            lex_modes.push(start..end);
        }
        Ok((lex_modes, lex_mode_symbols))
    }
}

fn string<'s>(strings: &[&'s str], id: u16) -> Result<&'s str, LoadError> {
    strings
        .get(id as usize)
        .copied()
        .ok_or_else(|| corrupt(format!("invalid string id {id}")))
}
