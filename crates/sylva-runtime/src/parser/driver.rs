//! The LR driver loop.

use std::sync::Arc;

use sylva_table::{Action, ERROR_LEX_MODE, FieldId, GrammarTable, LexModeId, StateId, Symbol};

use super::ParseStats;
use super::reusable::ReusableNode;
use super::stack::{Entry, Stack};
use super::trace::Tracer;
use crate::length::Length;
use crate::lexer::Lexer;
use crate::tree::subtree::{Subtree, SubtreeData, join_errors, with_extra};

enum Next {
    Token(Subtree),
    /// A reused subtree went straight onto the stack.
    Pushed,
}

/// What to do after an error was handled.
pub(super) enum Recovered {
    /// Retry the same lookahead against the repaired stack.
    Retry(Subtree),
    /// The lookahead was consumed; lex the next one.
    Consumed,
    /// Parsing is over.
    Finished(Subtree),
}

pub(super) struct Driver<'a, T: Tracer> {
    pub(super) table: &'a GrammarTable,
    lexer: Lexer<'a>,
    pub(super) tracer: &'a mut T,
    pub(super) stack: Stack,
    reusable: Option<ReusableNode<'a>>,
    /// End of the last consumed token: where the next lookahead's padding
    /// begins.
    pub(super) position: Length,
    /// After skipping a token, lex in the error mode until the next shift.
    pub(super) error_mode: bool,
    /// The current lookahead was lexed in the error mode.
    lookahead_in_error_mode: bool,
    /// Position and stack depth of the last pop recovery. Further pops at
    /// the same position must go deeper.
    pub(super) last_recovery: Option<(u32, usize)>,
    /// Reductions since input was last consumed, and how many are allowed
    /// before the lookahead is treated as an error.
    reductions: usize,
    reduction_limit: usize,
    pub(super) stats: ParseStats,
}

impl<'a, T: Tracer> Driver<'a, T> {
    pub fn new(
        table: &'a GrammarTable,
        text: &'a str,
        old_root: Option<&'a Subtree>,
        tracer: &'a mut T,
    ) -> Self {
        Self {
            table,
            lexer: Lexer::new(table, text),
            tracer,
            stack: Stack::default(),
            reusable: old_root.map(ReusableNode::new),
            position: Length::ZERO,
            error_mode: false,
            lookahead_in_error_mode: false,
            last_recovery: None,
            reductions: 0,
            reduction_limit: reduction_limit(table, 0),
            stats: ParseStats::default(),
        }
    }

    /// Parse to completion, returning the root and the run's statistics.
    pub fn run(mut self) -> (Subtree, ParseStats) {
        let mut lookahead: Option<Subtree> = None;
        loop {
            let state = self.stack.state();
            let token = match lookahead.take() {
                Some(token) => token,
                None => match self.next_lookahead(state) {
                    Next::Token(token) => token,
                    Next::Pushed => {
                        self.consumed();
                        continue;
                    }
                },
            };

            let recovered = match self.table.action(state, token.symbol) {
                Some(Action::Shift(target)) => {
                    self.shift(state, target, token);
                    continue;
                }
                Some(Action::Reduce(production)) => {
                    if self.reductions < self.reduction_limit && self.reduce(production, &token) {
                        self.reductions += 1;
                        lookahead = Some(token);
                        continue;
                    }
                    if self.reductions >= self.reduction_limit {
                        tracing::debug!(state, reductions = self.reductions, "reduction limit reached");
                    }
                    self.recover(token)
                }
                Some(Action::Accept) => {
                    self.tracer.trace_accept(state);
                    let stats = self.stats;
                    let root = self.accept(&token);
                    return (root, stats);
                }
                _ if token.symbol != Symbol::END && self.table.is_extra(token.symbol) => {
                    self.shift_extra(state, token);
                    continue;
                }
                _ => self.recover(token),
            };
            self.consumed();

            match recovered {
                Recovered::Retry(token) => lookahead = Some(token),
                Recovered::Consumed => {}
                Recovered::Finished(root) => return (root, self.stats),
            }
        }
    }

    fn next_lookahead(&mut self, state: StateId) -> Next {
        if !self.error_mode {
            if let Some(node) = self.reusable_node(state) {
                let range = self.range_of(&node);
                self.tracer.trace_reuse(state, node.symbol, range);
                self.stats.nodes_reused += 1;
                self.stats.bytes_reused += node.total().bytes as usize;
                self.lookahead_in_error_mode = false;

                if self.table.is_terminal(node.symbol) {
                    return Next::Token(node);
                }
                // Reuse checks guarantee the goto exists.
                let target = self.table.goto(state, node.symbol).unwrap_or(state);
                let position = self.position;
                self.position += node.total();
                self.stack.push(target, node, position);
                return Next::Pushed;
            }
        }

        let mode = if self.error_mode {
            ERROR_LEX_MODE
        } else {
            self.table.lex_mode(state)
        };
        let token = self.lexer.next_token(self.position, mode);
        let start = self.position + token.padding;
        self.tracer
            .trace_lex(state, token.symbol, start.bytes..(start + token.size).bytes, mode);
        self.stats.tokens_lexed += 1;
        self.lookahead_in_error_mode = self.error_mode;

        let extra = self.table.is_extra(token.symbol);
        Next::Token(Arc::new(SubtreeData::leaf(&token, state, extra)))
    }

    /// Byte range of a lookahead that starts at the current position.
    pub(super) fn range_of(&self, node: &SubtreeData) -> std::ops::Range<u32> {
        let start = (self.position + node.padding).bytes;
        start..start + node.size.bytes
    }

    /// The next subtree from the old tree that can be taken over as is in
    /// `state`, if any starts exactly at the current position.
    fn reusable_node(&mut self, state: StateId) -> Option<Subtree> {
        let table = self.table;
        let position = self.position.bytes;
        let mode = table.lex_mode(state);
        let reusable = self.reusable.as_mut()?;

        loop {
            let (node, start) = reusable.current()?;
            let end = start.bytes + node.total().bytes;

            if start.bytes < position || node.total().bytes == 0 {
                if start.bytes < position && end > position && reusable.descend() {
                    continue;
                }
                reusable.advance();
                continue;
            }
            if start.bytes > position {
                return None;
            }

            if can_reuse(table, node, state, mode) {
                let node = Arc::clone(node);
                reusable.advance();
                return Some(node);
            }
            if !reusable.descend() {
                reusable.advance();
            }
        }
    }

    fn shift(&mut self, state: StateId, target: StateId, token: Subtree) {
        self.tracer.trace_shift(state, token.symbol, target);
        let node = with_extra(token, false);
        let position = self.position;
        self.position += node.total();
        self.stack.push(target, node, position);
        self.error_mode = false;
        self.last_recovery = None;
        self.consumed();
    }

    fn shift_extra(&mut self, state: StateId, token: Subtree) {
        self.tracer.trace_extra(state, token.symbol);
        let node = with_extra(token, true);
        let position = self.position;
        self.position += node.total();
        self.stack.push(state, node, position);
        self.consumed();
    }

    /// Input was consumed or recovery changed the stack: restart the
    /// reduction budget from the current depth.
    fn consumed(&mut self) {
        self.reductions = 0;
        self.reduction_limit = reduction_limit(self.table, self.stack.depth());
    }

    /// Apply a reduction. False if the table has no such production.
    fn reduce(&mut self, production: u16, lookahead: &Subtree) -> bool {
        let table = self.table;
        let Some(production) = table.production(production) else {
            return false;
        };
        let state = self.stack.state();
        let (children, trailing) = self.stack.pop_children(production.child_count());
        let exposed = self.stack.state();
        let fallback = trailing.first().map_or(self.position, |entry| entry.position);

        let (node, position) =
            self.build_node(production.lhs, children, &production.fields, fallback, exposed, lookahead);
        let child_count = node.children.len();
        let target = table.goto(exposed, production.lhs).unwrap_or(exposed);
        self.tracer.trace_reduce(state, production.lhs, child_count, target);

        self.stack.push(target, node, position);
        for entry in trailing {
            self.stack.push(target, entry.node, entry.position);
        }
        true
    }

    /// Combine stack entries into a node of `symbol`.
    ///
    /// Hidden nonterminal children are replaced by their own children, which
    /// inherit the hidden child's field when they have none. `ERROR`
    /// children of an `ERROR` node are flattened the same way.
    pub(super) fn build_node(
        &self,
        symbol: Symbol,
        entries: Vec<Entry>,
        fields: &[Option<FieldId>],
        fallback: Length,
        parse_state: StateId,
        lookahead: &Subtree,
    ) -> (Subtree, Length) {
        let position = entries.first().map_or(fallback, |entry| entry.position);
        let end = entries.last().map_or(fallback, Entry::end);
        let padding = entries.first().map_or(Length::ZERO, |entry| entry.node.padding);

        let lookahead_end = (self.position + lookahead.total()).bytes as u64 + lookahead.lookahead_bytes as u64;
        let mut reach = lookahead_end;
        let mut children = Vec::with_capacity(entries.len());
        let mut child_fields = Vec::with_capacity(entries.len());
        let mut has_error = symbol == Symbol::ERROR;
        let mut first_leaf_mode = None;
        let mut field_index = 0;

        for entry in entries {
            let field = if entry.node.extra {
                None
            } else {
                field_index += 1;
                fields.get(field_index - 1).copied().flatten()
            };
            reach = reach.max(entry.end().bytes as u64 + entry.node.lookahead_bytes as u64);
            has_error |= entry.node.has_error;
            first_leaf_mode = first_leaf_mode.or(entry.node.first_leaf_mode);

            let splice = !entry.node.children.is_empty()
                && ((!entry.node.extra && self.is_hidden_nonterminal(entry.node.symbol))
                    || (symbol == Symbol::ERROR && entry.node.is_error()));
            if splice {
                for (child, &inner) in entry.node.children.iter().zip(&entry.node.fields) {
                    push_child(symbol, &mut children, &mut child_fields, Arc::clone(child), inner.or(field));
                }
            } else {
                push_child(symbol, &mut children, &mut child_fields, entry.node, field);
            }
        }

        let trailing_lex_mode = if self.lookahead_in_error_mode {
            None
        } else {
            lookahead.first_leaf_mode
        };
        let node = SubtreeData {
            symbol,
            padding,
            size: end - (position + padding),
            children,
            fields: child_fields,
            parse_state,
            first_leaf_mode,
            trailing_lex_mode,
            lookahead_bytes: reach.saturating_sub(end.bytes as u64) as u32,
            extra: false,
            has_error,
            damaged: false,
        };
        (Arc::new(node), position)
    }

    fn is_hidden_nonterminal(&self, symbol: Symbol) -> bool {
        !self.table.is_terminal(symbol) && !self.table.is_visible(symbol)
    }

    /// Finish on `Accept`: the root takes the start node's children and any
    /// extras around it, and spans the whole input.
    fn accept(self, lookahead: &Subtree) -> Subtree {
        let start = self.table.start_symbol();
        let mut nodes = Vec::new();
        for entry in self.stack.into_entries() {
            if !entry.node.extra && entry.node.symbol == start {
                nodes.extend(entry.node.children.iter().cloned().zip(entry.node.fields.iter().copied()));
            } else {
                nodes.push((entry.node, None));
            }
        }
        root(start, nodes, self.lexer.text(), lookahead)
    }

    pub(super) fn text(&self) -> &'a str {
        self.lexer.text()
    }
}

/// Append a child. Inside an `ERROR` node an unmatched character that
/// directly follows another one extends it.
fn push_child(
    parent: Symbol,
    children: &mut Vec<Subtree>,
    fields: &mut Vec<Option<FieldId>>,
    child: Subtree,
    field: Option<FieldId>,
) {
    if parent == Symbol::ERROR
        && field.is_none()
        && let Some(last) = children.last_mut()
        && let Some(joined) = join_errors(last, &child)
    {
        *last = joined;
        return;
    }
    children.push(child);
    fields.push(field);
}

/// A root node that spans the entire text.
pub(super) fn root(
    symbol: Symbol,
    nodes: Vec<(Subtree, Option<FieldId>)>,
    text: &str,
    lookahead: &Subtree,
) -> Subtree {
    let has_error = nodes.iter().any(|(node, _)| node.has_error);
    let first_leaf_mode = nodes.iter().find_map(|(node, _)| node.first_leaf_mode);
    let (children, fields): (Vec<_>, Vec<_>) = nodes.into_iter().unzip();
    Arc::new(SubtreeData {
        symbol,
        padding: Length::ZERO,
        size: Length::of(text),
        children,
        fields,
        parse_state: 0,
        first_leaf_mode,
        trailing_lex_mode: lookahead.first_leaf_mode,
        lookahead_bytes: 1,
        extra: false,
        has_error,
        damaged: false,
    })
}

/// Reductions a well-formed table can apply without consuming input: every
/// entry on the stack can be reduced through each state at most once.
/// Tables with reduce/goto cycles stop here instead of looping.
fn reduction_limit(table: &GrammarTable, depth: usize) -> usize {
    (depth + 1).saturating_mul(table.state_count() + 1)
}

/// Whether `node` from the old tree would be rebuilt identically here.
fn can_reuse(table: &GrammarTable, node: &SubtreeData, state: StateId, mode: LexModeId) -> bool {
    if node.damaged || node.has_error || node.first_leaf_mode != Some(mode) {
        return false;
    }
    if table.is_terminal(node.symbol) {
        return true;
    }
    if node.extra || node.parse_state != state {
        return false;
    }
    match (table.goto(state, node.symbol), node.trailing_lex_mode) {
        (Some(target), Some(trailing)) => table.lex_mode(target) == trailing,
        _ => false,
    }
}
