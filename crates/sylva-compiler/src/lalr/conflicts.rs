//! Action selection and conflict resolution.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use sylva_table::{StateId, Symbol};

use super::items::{Augmented, Item, ItemSet};
use super::{Automaton, ParseState, TableAction};
use crate::lower::{Assoc, Prec};
use crate::{Error, Result};

pub(super) fn resolve_state(
    grammar: &Augmented<'_>,
    automaton: &Automaton,
    state: usize,
) -> Result<ParseState> {
    let closure = grammar.closure(&automaton.kernels[state]);
    let resolver = Resolver {
        grammar,
        closure: &closure,
        state,
    };

    let mut reductions: BTreeMap<Symbol, Vec<usize>> = BTreeMap::new();
    for (&item, lookaheads) in &closure {
        if grammar.is_complete(item) {
            for &lookahead in lookaheads {
                reductions.entry(lookahead).or_default().push(item.production);
            }
        }
    }

    let mut result = ParseState::default();
    let mut shifts: BTreeMap<Symbol, StateId> = BTreeMap::new();
    for (&symbol, &target) in &automaton.transitions[state] {
        if grammar.grammar.is_terminal(symbol) {
            shifts.insert(symbol, target as StateId);
        } else {
            result.gotos.insert(symbol, target as StateId);
        }
    }

    for (&lookahead, &target) in &shifts {
        if !reductions.contains_key(&lookahead) {
            result.actions.insert(lookahead, TableAction::Shift(target));
        }
    }
    for (lookahead, productions) in reductions {
        let production = resolver.pick_reduction(lookahead, &productions)?;
        let action = match shifts.get(&lookahead) {
            Some(&target) => resolver.shift_or_reduce(lookahead, target, production)?,
            None => resolver.reduce_action(production),
        };
        result.actions.insert(lookahead, action);
    }
    Ok(result)
}

struct Resolver<'a> {
    grammar: &'a Augmented<'a>,
    closure: &'a ItemSet,
    state: usize,
}

impl Resolver<'_> {
    fn prec(&self, production: usize) -> Option<Prec> {
        self.grammar
            .grammar
            .productions
            .get(production)
            .and_then(|p| p.prec)
    }

    fn reduce_action(&self, production: usize) -> TableAction {
        if production == self.grammar.accept_production() {
            TableAction::Accept
        } else {
            TableAction::Reduce(production as u16)
        }
    }

    fn describe(&self, production: usize) -> String {
        if production == self.grammar.accept_production() {
            "accept".to_owned()
        } else {
            format!("reduce {}", self.grammar.grammar.describe_production(production))
        }
    }

    fn lookahead_name(&self, lookahead: Symbol) -> String {
        format!("'{}'", self.grammar.grammar.symbol_name(lookahead))
    }

    /// Among several complete items, the one with strictly highest precedence.
    fn pick_reduction(&self, lookahead: Symbol, productions: &[usize]) -> Result<usize> {
        if let [only] = productions {
            return Ok(*only);
        }

        let mut ranked: Vec<(i32, usize)> = productions
            .iter()
            .map(|&p| (self.prec(p).map_or(0, |prec| prec.value), p))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        if ranked[0].0 == ranked[1].0 {
            return Err(Error::Conflict {
                kind: "reduce/reduce",
                lookahead: self.lookahead_name(lookahead),
                candidates: productions.iter().map(|&p| self.describe(p)).collect(),
            });
        }
        tracing::trace!(
            state = self.state,
            lookahead = %self.lookahead_name(lookahead),
            "reduce/reduce resolved by precedence"
        );
        Ok(ranked[0].1)
    }

    /// Compare the reduction's precedence with the items that would shift.
    /// Ties go to associativity.
    fn shift_or_reduce(
        &self,
        lookahead: Symbol,
        target: StateId,
        production: usize,
    ) -> Result<TableAction> {
        let reduce_prec = self.prec(production);
        let shifting: Vec<Item> = self
            .closure
            .keys()
            .copied()
            .filter(|&item| self.grammar.next_symbol(item) == Some(lookahead))
            .collect();
        let shift_prec = shifting
            .iter()
            .filter_map(|item| self.prec(item.production))
            .map(|prec| prec.value)
            .max();

        let reduce = self.reduce_action(production);
        let shift = TableAction::Shift(target);

        if reduce_prec.is_none() && shift_prec.is_none() {
            return Err(self.shift_reduce_conflict(lookahead, production, &shifting));
        }

        let reduce_value = reduce_prec.map_or(0, |prec| prec.value);
        let shift_value = shift_prec.unwrap_or(0);
        let chosen = match reduce_value.cmp(&shift_value) {
            Ordering::Greater => reduce,
            Ordering::Less => shift,
            Ordering::Equal => match reduce_prec.map(|prec| prec.assoc) {
                Some(Assoc::Left) => reduce,
                Some(Assoc::Right) => shift,
                _ => return Err(self.shift_reduce_conflict(lookahead, production, &shifting)),
            },
        };

        tracing::trace!(
            state = self.state,
            lookahead = %self.lookahead_name(lookahead),
            chosen = ?chosen,
            "shift/reduce resolved by precedence"
        );
        Ok(chosen)
    }

    fn shift_reduce_conflict(&self, lookahead: Symbol, production: usize, shifting: &[Item]) -> Error {
        let mut candidates = vec![self.describe(production)];
        for item in shifting {
            if item.production != self.grammar.accept_production() {
                let described = self.grammar.grammar.describe_production(item.production);
                let shift = format!("shift {described}");
                if !candidates.contains(&shift) {
                    candidates.push(shift);
                }
            }
        }
        Error::Conflict {
            kind: "shift/reduce",
            lookahead: self.lookahead_name(lookahead),
            candidates,
        }
    }
}
