//! Maximal-munch tokenizer.
//!
//! Each terminal of the active lex mode is matched with its own anchored DFA
//! at the current position. The longest match wins; ties go to the higher
//! lexical precedence, then to string literals, then to the lower symbol id.
//! Trivia (hidden extras such as whitespace) is folded into the padding of
//! the following token.


use regex_automata::dfa::Automaton;
use regex_automata::dfa::sparse::DFA;
use regex_automata::{Anchored, Input};
use sylva_table::{GrammarTable, LexModeId, Symbol};

use crate::length::{Length, Point};

/// One lexed terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub symbol: Symbol,
    /// Trivia consumed before the token.
    pub padding: Length,
    pub size: Length,
    /// How many bytes past the token's end the lexer looked at. The end of
    /// input counts as one byte.
    pub lookahead_bytes: u32,
    pub lex_mode: LexModeId,
}

impl Token {
    pub fn is_end(&self) -> bool {
        self.symbol == Symbol::END
    }
}

#[derive(Clone, Copy)]
struct Candidate {
    symbol: Symbol,
    end: usize,
    prec: i16,
    literal: bool,
}

impl Candidate {
    /// Symbols are tried in ascending order, so an exact tie keeps the
    /// earlier (lower) one.
    fn beats(&self, other: &Candidate) -> bool {
        (self.end, self.prec, self.literal) > (other.end, other.prec, other.literal)
    }
}

pub struct Lexer<'a> {
    table: &'a GrammarTable,
    text: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(table: &'a GrammarTable, text: &'a str) -> Self {
        Self { table, text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Lex the token that starts at `position` (before any padding).
    ///
    /// Never fails: a character no terminal of the mode matches becomes a
    /// one-character `ERROR` token, and the end of input yields `END`.
    pub fn next_token(&self, position: Length, mode: LexModeId) -> Token {
        let symbols = self.table.lex_mode_symbols(mode);
        let mut start = position;
        let mut examined = position.bytes as usize;

        loop {
            let at = start.bytes as usize;
            if at >= self.text.len() {
                examined = examined.max(self.text.len() + 1);
                return self.token(Symbol::END, position, start, at, examined, mode);
            }

            match self.longest_match(symbols, at, start == position, &mut examined) {
                Some(candidate) if self.is_trivia(candidate.symbol) => {
                    start += self.span(at, candidate.end);
                }
                Some(candidate) => {
                    return self.token(candidate.symbol, position, start, candidate.end, examined, mode);
                }
                None => {
                    let end = at + self.char_width(at);
                    examined = examined.max(end);
                    return self.token(Symbol::ERROR, position, start, end, examined, mode);
                }
            }
        }
    }

    fn char_width(&self, at: usize) -> usize {
        self.text
            .get(at..)
            .and_then(|rest| rest.chars().next())
            .map_or(1, char::len_utf8)
    }

    fn is_trivia(&self, symbol: Symbol) -> bool {
        self.table.symbol(symbol).is_some_and(|info| info.is_trivia())
    }

    fn longest_match(
        &self,
        symbols: &[Symbol],
        at: usize,
        immediate_ok: bool,
        examined: &mut usize,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for &symbol in symbols {
            let Some(info) = self.table.symbol(symbol) else {
                continue;
            };
            if info.immediate && !immediate_ok {
                continue;
            }
            let Some(lexeme) = self.table.lexeme(symbol) else {
                continue;
            };

            let (end, seen) = run(lexeme.dfa(), self.text.as_bytes(), at);
            *examined = (*examined).max(seen);
            let Some(end) = end else {
                continue;
            };

            let candidate = Candidate {
                symbol,
                end,
                prec: info.lex_prec,
                literal: info.literal,
            };
            if best.as_ref().is_none_or(|best| candidate.beats(best)) {
                best = Some(candidate);
            }
        }
        best
    }

    fn token(
        &self,
        symbol: Symbol,
        position: Length,
        start: Length,
        end: usize,
        examined: usize,
        mode: LexModeId,
    ) -> Token {
        let begin = start.bytes as usize;
        Token {
            symbol,
            padding: start - position,
            size: self.span(begin, end),
            lookahead_bytes: examined.saturating_sub(end) as u32,
            lex_mode: mode,
        }
    }

    fn span(&self, from: usize, to: usize) -> Length {
        match self.text.get(from..to) {
            Some(slice) => Length::of(slice),
            None => {
                let bytes = to.saturating_sub(from) as u32;
                Length {
                    bytes,
                    extent: Point::new(0, bytes),
                }
            }
        }
    }
}

/// Run an anchored DFA from `at`. Returns the end of the longest match and
/// the end of the examined region.
fn run(dfa: &DFA<Vec<u8>>, bytes: &[u8], at: usize) -> (Option<usize>, usize) {
    let input = Input::new(bytes).range(at..).anchored(Anchored::Yes);
    let Ok(mut state) = dfa.start_state_forward(&input) else {
        return (None, at);
    };

    // Matches are reported one byte late: entering a match state on the
    // byte at `pos` means a match ends at `pos`.
    let mut last = None;
    for (pos, &byte) in bytes.iter().enumerate().skip(at) {
        state = dfa.next_state(state, byte);
        if dfa.is_match_state(state) {
            if pos > at {
                last = Some(pos);
            }
        } else if dfa.is_dead_state(state) || dfa.is_quit_state(state) {
            return (last, pos + 1);
        }
    }

    state = dfa.next_eoi_state(state);
    if dfa.is_match_state(state) && bytes.len() > at {
        last = Some(bytes.len());
    }
    (last, bytes.len() + 1)
}
