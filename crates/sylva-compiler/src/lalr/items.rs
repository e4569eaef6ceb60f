//! LR(1) items, FIRST sets, and closure.

use std::collections::{BTreeMap, BTreeSet};

use sylva_table::Symbol;

use crate::lower::LoweredGrammar;

/// A production with a dot position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Item {
    pub production: usize,
    pub dot: usize,
}

impl Item {
    pub fn advance(self) -> Item {
        Item {
            production: self.production,
            dot: self.dot + 1,
        }
    }
}

pub(crate) type Lookaheads = BTreeSet<Symbol>;
pub(crate) type ItemSet = BTreeMap<Item, Lookaheads>;

/// The augmented grammar: every lowered production plus `S' → start`.
pub(crate) struct Augmented<'a> {
    pub grammar: &'a LoweredGrammar,
    /// Lowered productions as (lhs, rhs). The augmented start lives at
    /// index [`Augmented::accept_production`] and is not stored here.
    pub productions: Vec<(Symbol, &'a [Symbol])>,
    by_lhs: Vec<Vec<usize>>,
    nullable: Vec<bool>,
    first: Vec<BTreeSet<Symbol>>,
    start_rhs: [Symbol; 1],
}

impl<'a> Augmented<'a> {
    pub fn new(grammar: &'a LoweredGrammar) -> Self {
        let symbol_count = grammar.symbols.len() + 1;
        let mut this = Self {
            grammar,
            productions: Vec::with_capacity(grammar.productions.len() + 1),
            by_lhs: vec![Vec::new(); symbol_count],
            nullable: vec![false; symbol_count],
            first: vec![BTreeSet::new(); symbol_count],
            start_rhs: [grammar.start],
        };
        for production in &grammar.productions {
            this.productions.push((production.lhs, production.rhs.as_slice()));
        }
        for (index, (lhs, _)) in this.productions.iter().enumerate() {
            this.by_lhs[lhs.index()].push(index);
        }
        let (accept_symbol, accept_production) = (this.accept_symbol(), this.accept_production());
        this.by_lhs[accept_symbol.index()].push(accept_production);
        this.compute_first();
        this
    }

    /// The synthetic `S'`, one past the last real symbol.
    pub fn accept_symbol(&self) -> Symbol {
        Symbol(self.grammar.symbols.len() as u16)
    }

    pub fn accept_production(&self) -> usize {
        self.grammar.productions.len()
    }

    pub fn rhs(&self, production: usize) -> &[Symbol] {
        if production == self.accept_production() {
            &self.start_rhs
        } else {
            self.productions[production].1
        }
    }

    /// Symbol after the dot, if any.
    pub fn next_symbol(&self, item: Item) -> Option<Symbol> {
        self.rhs(item.production).get(item.dot).copied()
    }

    pub fn is_complete(&self, item: Item) -> bool {
        item.dot >= self.rhs(item.production).len()
    }

    fn is_terminal(&self, symbol: Symbol) -> bool {
        self.grammar.is_terminal(symbol)
    }

    fn compute_first(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for production in 0..self.productions.len() {
                let (lhs, rhs) = self.productions[production];
                let mut all_nullable = true;
                for &symbol in rhs {
                    if self.is_terminal(symbol) {
                        changed |= self.first[lhs.index()].insert(symbol);
                        all_nullable = false;
                        break;
                    }
                    if symbol != lhs {
                        let inherited: Vec<Symbol> =
                            self.first[symbol.index()].iter().copied().collect();
                        for terminal in inherited {
                            changed |= self.first[lhs.index()].insert(terminal);
                        }
                    }
                    if !self.nullable[symbol.index()] {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable && !self.nullable[lhs.index()] {
                    self.nullable[lhs.index()] = true;
                    changed = true;
                }
            }
        }
    }

    /// FIRST of a symbol string, and whether the whole string is nullable.
    fn first_of(&self, symbols: &[Symbol]) -> (Lookaheads, bool) {
        let mut result = Lookaheads::new();
        for &symbol in symbols {
            if self.is_terminal(symbol) {
                result.insert(symbol);
                return (result, false);
            }
            result.extend(self.first[symbol.index()].iter().copied());
            if !self.nullable[symbol.index()] {
                return (result, false);
            }
        }
        (result, true)
    }

    /// LR(1) closure of a kernel.
    pub fn closure(&self, kernel: &ItemSet) -> ItemSet {
        let mut items = kernel.clone();
        let mut work: Vec<Item> = items.keys().copied().collect();

        while let Some(item) = work.pop() {
            let Some(next) = self.next_symbol(item) else {
                continue;
            };
            if self.is_terminal(next) {
                continue;
            }

            let rest = &self.rhs(item.production)[item.dot + 1..];
            let (mut lookaheads, nullable) = self.first_of(rest);
            if nullable {
                lookaheads.extend(items[&item].iter().copied());
            }

            for &production in &self.by_lhs[next.index()] {
                let candidate = Item { production, dot: 0 };
                let is_new = !items.contains_key(&candidate);
                let entry = items.entry(candidate).or_default();
                let before = entry.len();
                entry.extend(lookaheads.iter().copied());
                if is_new || entry.len() != before {
                    work.push(candidate);
                }
            }
        }
        items
    }
}
