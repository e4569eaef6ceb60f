//! Tracing infrastructure for debugging parses.
//!
//! The parser is generic over [`Tracer`]. [`NoopTracer`] compiles away;
//! [`PrintTracer`] collects a human-readable log of every parser step.

use std::fmt;
use std::ops::Range;

use sylva_core::Colors;
use sylva_table::{GrammarTable, LexModeId, StateId, Symbol};

/// How much detail [`PrintTracer`] records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Shifts, reductions, recoveries, and acceptance.
    #[default]
    Default,
    /// Also every lexed and reused token.
    Verbose,
    /// Also lex modes and token text.
    VeryVerbose,
}

/// The recovery strategy the parser applied at an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// Popped entries off the stack into an `ERROR` node.
    PopStack { entries: usize },
    /// Turned the lookahead into an `ERROR` node and moved on.
    SkipToken,
    /// Reached the end of input; wrapped the whole stack in `ERROR`.
    WrapAll,
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recovery::PopStack { entries } => write!(f, "pop {entries}"),
            Recovery::SkipToken => f.write_str("skip"),
            Recovery::WrapAll => f.write_str("wrap"),
        }
    }
}

/// Parser observation hooks.
///
/// Every method receives the state on top of the stack when the step
/// happened:
/// - `trace_lex`: a token was lexed from the text
/// - `trace_reuse`: a subtree of the old tree was taken over
/// - `trace_shift`: a token was shifted into `target`
/// - `trace_extra`: an extra was shifted without changing state
/// - `trace_reduce`: `child_count` entries were reduced to `symbol`
/// - `trace_recover`: error recovery covered `range`
/// - `trace_accept`: the parse finished
pub trait Tracer {
    fn trace_lex(&mut self, state: StateId, symbol: Symbol, range: Range<u32>, mode: LexModeId);
    fn trace_reuse(&mut self, state: StateId, symbol: Symbol, range: Range<u32>);
    fn trace_shift(&mut self, state: StateId, symbol: Symbol, target: StateId);
    fn trace_extra(&mut self, state: StateId, symbol: Symbol);
    fn trace_reduce(&mut self, state: StateId, symbol: Symbol, child_count: usize, target: StateId);
    fn trace_recover(&mut self, state: StateId, recovery: Recovery, range: Range<u32>);
    fn trace_accept(&mut self, state: StateId);
}

/// Zero-cost tracer.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_lex(&mut self, _: StateId, _: Symbol, _: Range<u32>, _: LexModeId) {}

    #[inline(always)]
    fn trace_reuse(&mut self, _: StateId, _: Symbol, _: Range<u32>) {}

    #[inline(always)]
    fn trace_shift(&mut self, _: StateId, _: Symbol, _: StateId) {}

    #[inline(always)]
    fn trace_extra(&mut self, _: StateId, _: Symbol) {}

    #[inline(always)]
    fn trace_reduce(&mut self, _: StateId, _: Symbol, _: usize, _: StateId) {}

    #[inline(always)]
    fn trace_recover(&mut self, _: StateId, _: Recovery, _: Range<u32>) {}

    #[inline(always)]
    fn trace_accept(&mut self, _: StateId) {}
}

/// Collects trace lines for printing.
pub struct PrintTracer<'a> {
    table: &'a GrammarTable,
    source: &'a str,
    verbosity: Verbosity,
    colors: Colors,
    lines: Vec<String>,
}

impl<'a> PrintTracer<'a> {
    pub fn new(table: &'a GrammarTable, source: &'a str, verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            table,
            source,
            verbosity,
            colors,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn label(&self, symbol: Symbol) -> String {
        let c = self.colors;
        match self.table.symbol(symbol) {
            Some(info) if info.literal => format!("{}{:?}{}", c.green, info.name, c.reset),
            Some(_) if symbol == Symbol::ERROR => format!("{}ERROR{}", c.red, c.reset),
            Some(info) => format!("{}{}{}", c.blue, info.name, c.reset),
            None => format!("#{}", symbol.0),
        }
    }

    fn range(&self, range: &Range<u32>) -> String {
        let c = self.colors;
        format!("{}{}..{}{}", c.dim, range.start, range.end, c.reset)
    }

    fn push(&mut self, state: StateId, op: &str, detail: String) {
        let c = self.colors;
        let line = if detail.is_empty() {
            format!("{}{state:<4}{}{op}", c.dim, c.reset)
        } else {
            format!("{}{state:<4}{}{op:<8}{detail}", c.dim, c.reset)
        };
        self.lines.push(line);
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_lex(&mut self, state: StateId, symbol: Symbol, range: Range<u32>, mode: LexModeId) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let mut detail = format!("{} {}", self.label(symbol), self.range(&range));
        if self.verbosity == Verbosity::VeryVerbose {
            let text = self
                .source
                .get(range.start as usize..range.end as usize)
                .unwrap_or("");
            detail.push_str(&format!(" mode {mode} {text:?}"));
        }
        self.push(state, "lex", detail);
    }

    fn trace_reuse(&mut self, state: StateId, symbol: Symbol, range: Range<u32>) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let detail = format!("{} {}", self.label(symbol), self.range(&range));
        self.push(state, "reuse", detail);
    }

    fn trace_shift(&mut self, state: StateId, symbol: Symbol, target: StateId) {
        let detail = format!("{} → {target}", self.label(symbol));
        self.push(state, "shift", detail);
    }

    fn trace_extra(&mut self, state: StateId, symbol: Symbol) {
        let detail = self.label(symbol);
        self.push(state, "extra", detail);
    }

    fn trace_reduce(&mut self, state: StateId, symbol: Symbol, child_count: usize, target: StateId) {
        let detail = format!("{} ({child_count}) → {target}", self.label(symbol));
        self.push(state, "reduce", detail);
    }

    fn trace_recover(&mut self, state: StateId, recovery: Recovery, range: Range<u32>) {
        let c = self.colors;
        let detail = format!("{}{recovery}{} {}", c.red, c.reset, self.range(&range));
        self.push(state, "recover", detail);
    }

    fn trace_accept(&mut self, state: StateId) {
        self.push(state, "accept", String::new());
    }
}
