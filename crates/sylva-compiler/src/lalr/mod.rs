//! LALR(1) parse table construction.
//!
//! States are built over LR(0) cores; LR(1) lookaheads of kernels with the
//! same core are merged and re-propagated until nothing changes. Conflicts
//! are resolved by precedence and associativity or reported as errors.

mod conflicts;
mod items;

#[cfg(test)]
mod lalr_tests;

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use indexmap::IndexMap;
use sylva_table::{LexModeId, ProductionId, StateId, Symbol};

use crate::lower::LoweredGrammar;
use crate::{Error, Result};

use items::{Augmented, Item, ItemSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TableAction {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
}

#[derive(Debug, Default)]
pub(crate) struct ParseState {
    /// Actions on terminal lookaheads.
    pub actions: BTreeMap<Symbol, TableAction>,
    pub gotos: BTreeMap<Symbol, StateId>,
    pub lex_mode: LexModeId,
}

#[derive(Debug)]
pub(crate) struct ParseTable {
    pub states: Vec<ParseState>,
    /// Terminals per lex mode. Mode 0 holds every lexical terminal.
    pub lex_modes: Vec<Vec<Symbol>>,
}

pub(crate) fn build(grammar: &LoweredGrammar) -> Result<ParseTable> {
    let augmented = Augmented::new(grammar);
    let automaton = Automaton::build(&augmented)?;

    let mut states = (0..automaton.kernels.len())
        .map(|state| conflicts::resolve_state(&augmented, &automaton, state))
        .collect::<Result<Vec<_>>>()?;
    let lex_modes = assign_lex_modes(grammar, &mut states)?;

    tracing::debug!(
        states = states.len(),
        lex_modes = lex_modes.len(),
        "built LALR(1) table"
    );
    Ok(ParseTable { states, lex_modes })
}

/// The LALR(1) state machine before conflict resolution.
pub(crate) struct Automaton {
    /// Kernel items of each state, with merged lookaheads.
    pub kernels: Vec<ItemSet>,
    pub transitions: Vec<BTreeMap<Symbol, usize>>,
}

impl Automaton {
    fn build(grammar: &Augmented<'_>) -> Result<Self> {
        let start = Item {
            production: grammar.accept_production(),
            dot: 0,
        };
        let mut automaton = Automaton {
            kernels: vec![ItemSet::from([(start, BTreeSet::from([Symbol::END]))])],
            transitions: vec![BTreeMap::new()],
        };
        let mut cores: HashMap<Vec<Item>, usize> = HashMap::from([(vec![start], 0)]);
        let mut queued = vec![true];
        let mut work = VecDeque::from([0usize]);

        while let Some(state) = work.pop_front() {
            queued[state] = false;
            let closure = grammar.closure(&automaton.kernels[state]);

            let mut successors: BTreeMap<Symbol, ItemSet> = BTreeMap::new();
            for (&item, lookaheads) in &closure {
                if let Some(symbol) = grammar.next_symbol(item) {
                    successors
                        .entry(symbol)
                        .or_default()
                        .entry(item.advance())
                        .or_default()
                        .extend(lookaheads.iter().copied());
                }
            }

            for (symbol, kernel) in successors {
                let core: Vec<Item> = kernel.keys().copied().collect();
                let target = match cores.get(&core) {
                    Some(&target) => {
                        if merge(&mut automaton.kernels[target], kernel) && !queued[target] {
                            queued[target] = true;
                            work.push_back(target);
                        }
                        target
                    }
                    None => {
                        let target = automaton.kernels.len();
                        if target >= u16::MAX as usize {
                            return Err(Error::TooMany {
                                what: "parse states",
                                count: target + 1,
                            });
                        }
                        automaton.kernels.push(kernel);
                        automaton.transitions.push(BTreeMap::new());
                        queued.push(true);
                        cores.insert(core, target);
                        work.push_back(target);
                        target
                    }
                };
                automaton.transitions[state].insert(symbol, target);
            }
        }
        Ok(automaton)
    }
}

/// Add lookaheads of `from` into `into`; true if anything was new.
fn merge(into: &mut ItemSet, from: ItemSet) -> bool {
    let mut changed = false;
    for (item, lookaheads) in from {
        let entry = into.entry(item).or_default();
        for lookahead in lookaheads {
            changed |= entry.insert(lookahead);
        }
    }
    changed
}

/// A state's lex mode holds the terminals it has actions for, plus extras.
/// Identical sets share a mode.
fn assign_lex_modes(grammar: &LoweredGrammar, states: &mut [ParseState]) -> Result<Vec<Vec<Symbol>>> {
    let lexical: BTreeSet<Symbol> = grammar.lexical_terminals().collect();
    let extras: Vec<Symbol> = grammar.extras().collect();

    let mut modes: IndexMap<Vec<Symbol>, LexModeId> = IndexMap::new();
    modes.insert(lexical.iter().copied().collect(), 0);

    for state in states.iter_mut() {
        let mut symbols: BTreeSet<Symbol> = state
            .actions
            .keys()
            .copied()
            .filter(|symbol| lexical.contains(symbol))
            .collect();
        symbols.extend(extras.iter().copied());
        let symbols: Vec<Symbol> = symbols.into_iter().collect();

        let next = modes.len();
        let mode = *modes.entry(symbols).or_insert(next as LexModeId);
        if next > u16::MAX as usize {
            return Err(Error::TooMany {
                what: "lex modes",
                count: next,
            });
        }
        state.lex_mode = mode;
    }
    Ok(modes.into_keys().collect())
}
