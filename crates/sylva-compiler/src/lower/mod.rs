//! Grammar lowering.
//!
//! Turns the nested rule trees of a [`Grammar`] into flat productions over
//! numbered symbols. Token rules become terminals with a single regular
//! expression each; everything else becomes a non-terminal whose
//! alternatives are fully expanded (choices multiplied out, repetitions
//! replaced by hidden left-recursive helper rules).

mod expand;
mod tokens;

#[cfg(test)]
mod lower_tests;

use std::collections::{HashMap, VecDeque};

use indexmap::IndexSet;
use sylva_core::{Grammar, GrammarError, PrecedenceEntry};
use sylva_table::{FieldId, Symbol};

use crate::{Error, Result};

pub(crate) use expand::Alternative;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Assoc {
    None,
    Left,
    Right,
}

/// Parse precedence attached to a production.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Prec {
    pub value: i32,
    pub assoc: Assoc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TokenDef {
    pub pattern: String,
    pub literal: bool,
    pub immediate: bool,
    pub prec: i16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SymbolDef {
    pub name: String,
    /// `None` for non-terminals. Built-in terminals have a token without a
    /// pattern; see [`SymbolDef::lexeme`].
    pub token: Option<TokenDef>,
    pub terminal: bool,
    pub named: bool,
    pub visible: bool,
    pub extra: bool,
}

impl SymbolDef {
    pub fn lexeme(&self) -> Option<&TokenDef> {
        self.token.as_ref().filter(|t| !t.pattern.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProductionDef {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
    pub fields: Vec<Option<FieldId>>,
    pub prec: Option<Prec>,
}

#[derive(Debug)]
pub(crate) struct LoweredGrammar {
    pub name: String,
    pub symbols: Vec<SymbolDef>,
    pub productions: Vec<ProductionDef>,
    pub fields: Vec<String>,
    pub start: Symbol,
}

impl LoweredGrammar {
    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        self.symbols.get(symbol.index()).is_some_and(|s| s.terminal)
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        self.symbols.get(symbol.index()).map_or("", |s| s.name.as_str())
    }

    /// Terminals the lexer can produce: everything with a pattern.
    pub fn lexical_terminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| s.terminal && s.lexeme().is_some())
            .map(|(i, _)| Symbol(i as u16))
    }

    pub fn extras(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.lexical_terminals()
            .filter(|s| self.symbols[s.index()].extra)
    }

    pub fn describe_production(&self, index: usize) -> String {
        let production = &self.productions[index];
        let mut out = format!("{} →", self.symbol_name(production.lhs));
        if production.rhs.is_empty() {
            out.push_str(" ε");
        }
        for &symbol in &production.rhs {
            out.push(' ');
            out.push_str(self.symbol_name(symbol));
        }
        out
    }
}

pub(crate) fn lower(grammar: &Grammar) -> Result<LoweredGrammar> {
    let Some((start_name, _)) = grammar.start_rule() else {
        return Err(GrammarError::NoRules(grammar.name.clone()).into());
    };
    if !grammar.externals.is_empty() {
        return Err(Error::Unsupported {
            rule: start_name.to_owned(),
            feature: "external scanners",
        });
    }

    let mut lowerer = Lowerer::new(grammar, start_name);
    lowerer.run()?;
    let lowered = lowerer.finish();

    tracing::debug!(
        grammar = %lowered.name,
        symbols = lowered.symbols.len(),
        productions = lowered.productions.len(),
        fields = lowered.fields.len(),
        "lowered grammar"
    );
    Ok(lowered)
}

pub(crate) struct Lowerer<'g> {
    grammar: &'g Grammar,
    start_name: &'g str,
    symbols: Vec<SymbolDef>,
    productions: Vec<ProductionDef>,
    fields: IndexSet<String>,
    /// Named rules that already have a symbol.
    rule_symbols: HashMap<&'g str, Symbol>,
    /// Anonymous tokens keyed by (pattern, immediate).
    anonymous: HashMap<(String, bool), Symbol>,
    pending: VecDeque<&'g str>,
    /// Named precedences, higher binds tighter.
    precedence_ranks: HashMap<&'g str, i32>,
    repeat_counts: HashMap<String, usize>,
}

impl<'g> Lowerer<'g> {
    fn new(grammar: &'g Grammar, start_name: &'g str) -> Self {
        let mut precedence_ranks = HashMap::new();
        for list in &grammar.precedences {
            for (i, entry) in list.iter().enumerate() {
                if let PrecedenceEntry::Name(name) = entry {
                    precedence_ranks
                        .entry(name.as_str())
                        .or_insert((list.len() - i) as i32);
                }
            }
        }

        let builtin = |name: &str, named: bool| SymbolDef {
            name: name.to_owned(),
            token: None,
            terminal: true,
            named,
            visible: named,
            extra: false,
        };

        Self {
            grammar,
            start_name,
            symbols: vec![builtin("end", false), builtin("ERROR", true)],
            productions: Vec::new(),
            fields: IndexSet::new(),
            rule_symbols: HashMap::new(),
            anonymous: HashMap::new(),
            pending: VecDeque::new(),
            precedence_ranks,
            repeat_counts: HashMap::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        let grammar = self.grammar;
        let start_name = self.start_name;
        let start = self.rule_symbol(start_name, start_name)?;
        debug_assert_eq!(start, Symbol(2));

        for extra in &grammar.extras {
            self.extra(extra)?;
        }

        while let Some(name) = self.pending.pop_front() {
            let rule = &grammar.rules[name];
            let lhs = self.rule_symbols[name];
            let alternatives = self.expand(rule, name)?;
            for alternative in alternatives {
                if alternative.items.is_empty() && name != start_name {
                    return Err(Error::EmptyRule(name.to_owned()));
                }
                self.push_production(lhs, alternative);
            }
        }
        Ok(())
    }

    fn finish(self) -> LoweredGrammar {
        LoweredGrammar {
            name: self.grammar.name.clone(),
            symbols: self.symbols,
            productions: self.productions,
            fields: self.fields.into_iter().collect(),
            start: Symbol(2),
        }
    }

    fn extra(&mut self, rule: &'g sylva_core::Rule) -> Result<()> {
        use sylva_core::Rule;

        let start_name = self.start_name;
        if let Rule::Symbol(name) = rule {
            let symbol = self.rule_symbol(name, start_name)?;
            let def = &mut self.symbols[symbol.index()];
            if !def.terminal {
                return Err(Error::Unsupported {
                    rule: name.clone(),
                    feature: "non-token extras",
                });
            }
            def.extra = true;
            if name.starts_with('_') {
                def.visible = false;
            }
            return Ok(());
        }

        if !rule.is_lexical() {
            return Err(Error::Unsupported {
                rule: start_name.to_owned(),
                feature: "non-token extras",
            });
        }
        let symbol = self.anonymous_token(rule, start_name)?;
        let def = &mut self.symbols[symbol.index()];
        def.extra = true;
        def.visible = false;
        Ok(())
    }

    /// Symbol of a named rule, creating it on first reference.
    fn rule_symbol(&mut self, name: &str, referrer: &str) -> Result<Symbol> {
        if let Some(&symbol) = self.rule_symbols.get(name) {
            return Ok(symbol);
        }
        let grammar = self.grammar;
        let Some((key, rule)) = grammar.rules.get_key_value(name) else {
            return Err(Error::UnknownSymbol {
                rule: referrer.to_owned(),
                symbol: name.to_owned(),
            });
        };

        let hidden = grammar.is_hidden_rule(name);
        let def = if rule.is_lexical() && name != self.start_name {
            let token = self.token_def(rule, name)?;
            SymbolDef {
                name: key.clone(),
                token: Some(token),
                terminal: true,
                named: !hidden,
                visible: true,
                extra: false,
            }
        } else {
            self.pending.push_back(key.as_str());
            SymbolDef {
                name: key.clone(),
                token: None,
                terminal: false,
                named: true,
                visible: !hidden,
                extra: false,
            }
        };

        let symbol = self.push_symbol(def)?;
        self.rule_symbols.insert(key.as_str(), symbol);
        Ok(symbol)
    }

    /// Terminal for a string, pattern, or token appearing inside a rule.
    /// Only string literals are visible.
    fn anonymous_token(&mut self, rule: &sylva_core::Rule, owner: &str) -> Result<Symbol> {
        let token = self.token_def(rule, owner)?;
        let key = (token.pattern.clone(), token.immediate);
        if let Some(&symbol) = self.anonymous.get(&key) {
            return Ok(symbol);
        }

        let name = tokens::display_name(rule).unwrap_or_else(|| token.pattern.clone());
        let visible = token.literal;
        let symbol = self.push_symbol(SymbolDef {
            name,
            token: Some(token),
            terminal: true,
            named: false,
            visible,
            extra: false,
        })?;
        self.anonymous.insert(key, symbol);
        Ok(symbol)
    }

    fn push_symbol(&mut self, def: SymbolDef) -> Result<Symbol> {
        let index = self.symbols.len();
        if index >= u16::MAX as usize {
            return Err(Error::TooMany {
                what: "symbols",
                count: index + 1,
            });
        }
        self.symbols.push(def);
        Ok(Symbol(index as u16))
    }

    fn push_production(&mut self, lhs: Symbol, alternative: Alternative) {
        let (rhs, fields) = alternative.items.into_iter().unzip();
        self.productions.push(ProductionDef {
            lhs,
            rhs,
            fields,
            prec: alternative.prec,
        });
    }

    fn field_id(&mut self, name: &str) -> Result<FieldId> {
        let (index, _) = self.fields.insert_full(name.to_owned());
        u16::try_from(index + 1)
            .ok()
            .and_then(FieldId::new)
            .ok_or(Error::TooMany {
                what: "fields",
                count: index + 1,
            })
    }

    /// Hidden helper non-terminal for a repetition inside `owner`.
    fn repeat_symbol(&mut self, owner: &str) -> Result<Symbol> {
        let count = self.repeat_counts.entry(owner.to_owned()).or_insert(0);
        *count += 1;
        let name = format!("{owner}_repeat{count}");
        self.push_symbol(SymbolDef {
            name,
            token: None,
            terminal: false,
            named: false,
            visible: false,
            extra: false,
        })
    }

    fn resolve_precedence(&self, value: &sylva_core::Precedence, rule: &str) -> Result<i32> {
        use sylva_core::Precedence;

        match value {
            Precedence::Integer(n) => Ok(*n),
            Precedence::Name(name) => self
                .precedence_ranks
                .get(name.as_str())
                .copied()
                .ok_or_else(|| Error::UnknownPrecedence {
                    rule: rule.to_owned(),
                    name: name.clone(),
                }),
        }
    }
}
