//! Error recovery.
//!
//! When the lookahead has no action, the parser tries in order:
//! 1. pop back to the nearest stack entry whose state accepts the lookahead,
//!    folding the popped entries into an `ERROR` extra;
//! 2. skip the lookahead by folding it into an `ERROR` extra, lexing in the
//!    error mode from then on. Adjacent unmatched characters join into one
//!    `ERROR` leaf;
//! 3. at the end of input, wrap the whole stack in one `ERROR` under the
//!    root.
//!
//! Every step consumes input or shrinks the set of candidate depths, so
//! recovery always terminates.

use std::mem;
use std::ops::Range;
use std::sync::Arc;

use sylva_table::{StateId, Symbol};

use super::driver::{Driver, Recovered, root};
use super::stack::Entry;
use super::trace::{Recovery, Tracer};
use crate::tree::subtree::{Subtree, join_errors, with_extra};

impl<T: Tracer> Driver<'_, T> {
    pub(super) fn recover(&mut self, token: Subtree) -> Recovered {
        let state = self.stack.state();
        self.stats.recoveries += 1;

        if let Some(depth) = self.pop_depth(token.symbol) {
            let popped = self.stack.split_off(depth);
            let entries = popped.len();
            let range = covered(&popped);
            let restored = self.stack.state();
            let (error, position) =
                self.build_node(Symbol::ERROR, popped, &[], self.position, restored, &token);
            self.stack.push(restored, with_extra(error, true), position);
            self.last_recovery = Some((self.position.bytes, depth));
            self.tracer.trace_recover(state, Recovery::PopStack { entries }, range);
            return Recovered::Retry(token);
        }

        if token.symbol != Symbol::END {
            self.skip(state, token);
            return Recovered::Consumed;
        }

        Recovered::Finished(self.wrap_all(state, &token))
    }

    /// Deepest stack depth below the top whose state has an action for
    /// `symbol`. Repeated recoveries at one position only look deeper.
    fn pop_depth(&self, symbol: Symbol) -> Option<usize> {
        let mut limit = self.stack.depth();
        if let Some((at, depth)) = self.last_recovery {
            if at == self.position.bytes {
                limit = limit.min(depth);
            }
        }
        (0..limit)
            .rev()
            .find(|&depth| self.table.action(self.stack.state_at(depth), symbol).is_some())
    }

    fn skip(&mut self, state: StateId, token: Subtree) {
        let range = self.range_of(&token);
        let token_entry = Entry {
            state,
            node: Arc::clone(&token),
            position: self.position,
        };

        let top = self.stack.top().filter(|top| top.node.extra && top.node.is_error());
        let joined = top.and_then(|top| join_errors(&top.node, &token).map(|node| (node, top.position)));
        let merge = top.is_some();
        let (node, position) = if let Some(joined) = joined {
            self.stack.pop();
            joined
        } else if merge {
            let mut entries: Vec<Entry> = self.stack.pop().into_iter().collect();
            entries.push(token_entry);
            self.build_node(Symbol::ERROR, entries, &[], self.position, state, &token)
        } else if token.is_error() {
            (Arc::clone(&token), self.position)
        } else {
            self.build_node(Symbol::ERROR, vec![token_entry], &[], self.position, state, &token)
        };

        self.position += token.total();
        self.stack.push(state, with_extra(node, true), position);
        self.error_mode = true;
        self.tracer.trace_recover(state, Recovery::SkipToken, range);
    }

    fn wrap_all(&mut self, state: StateId, token: &Subtree) -> Subtree {
        let entries = mem::take(&mut self.stack).into_entries();
        let range = covered(&entries);
        let (error, _) = self.build_node(Symbol::ERROR, entries, &[], self.position, 0, token);
        self.tracer.trace_recover(state, Recovery::WrapAll, range);
        root(self.table.start_symbol(), vec![(error, None)], self.text(), token)
    }
}

/// Text covered by `entries`, excluding the first entry's padding.
fn covered(entries: &[Entry]) -> Range<u32> {
    match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => (first.position + first.node.padding).bytes..last.end().bytes,
        _ => 0..0,
    }
}
