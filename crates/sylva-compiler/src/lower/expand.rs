//! Expansion of structural rules into alternatives.

use sylva_core::Rule;
use sylva_table::{FieldId, Symbol};

use super::{Assoc, Lowerer, Prec};
use crate::{Error, Result};

/// Upper bound on the alternatives a single rule may expand to.
const MAX_ALTERNATIVES: usize = 4096;

/// One right-hand side of a rule, with a field name per item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Alternative {
    pub items: Vec<(Symbol, Option<FieldId>)>,
    pub prec: Option<Prec>,
}

impl Alternative {
    fn single(symbol: Symbol) -> Self {
        Self {
            items: vec![(symbol, None)],
            prec: None,
        }
    }

    fn then(&self, next: &Alternative) -> Alternative {
        let mut items = self.items.clone();
        items.extend_from_slice(&next.items);
        Alternative {
            items,
            prec: self.prec.or(next.prec),
        }
    }
}

impl Lowerer<'_> {
    pub(super) fn expand(&mut self, rule: &Rule, owner: &str) -> Result<Vec<Alternative>> {
        let alternatives = match rule {
            Rule::Blank => vec![Alternative::default()],
            Rule::String(_) | Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_) => {
                vec![Alternative::single(self.anonymous_token(rule, owner)?)]
            }
            Rule::Symbol(name) => vec![Alternative::single(self.rule_symbol(name, owner)?)],
            Rule::Seq(members) => {
                let mut product = vec![Alternative::default()];
                for member in members {
                    let next = self.expand(member, owner)?;
                    product = product
                        .iter()
                        .flat_map(|head| next.iter().map(|tail| head.then(tail)))
                        .collect();
                    check_count(product.len())?;
                }
                product
            }
            Rule::Choice(members) => {
                let mut alternatives: Vec<Alternative> = Vec::new();
                for member in members {
                    for alternative in self.expand(member, owner)? {
                        if !alternatives.contains(&alternative) {
                            alternatives.push(alternative);
                        }
                    }
                }
                check_count(alternatives.len())?;
                alternatives
            }
            Rule::Repeat(content) => {
                let mut alternatives = self.repeat(content, owner)?;
                if !alternatives.contains(&Alternative::default()) {
                    alternatives.push(Alternative::default());
                }
                alternatives
            }
            Rule::Repeat1(content) => self.repeat(content, owner)?,
            Rule::Field { name, content } => {
                let field = self.field_id(name)?;
                let mut alternatives = self.expand(content, owner)?;
                for alternative in &mut alternatives {
                    for (_, slot) in &mut alternative.items {
                        slot.get_or_insert(field);
                    }
                }
                alternatives
            }
            Rule::Alias { .. } => {
                return Err(Error::Unsupported {
                    rule: owner.to_owned(),
                    feature: "ALIAS",
                });
            }
            Rule::Prec { value, content } => self.with_prec(value, Assoc::None, content, owner)?,
            Rule::PrecLeft { value, content } => {
                self.with_prec(value, Assoc::Left, content, owner)?
            }
            Rule::PrecRight { value, content } => {
                self.with_prec(value, Assoc::Right, content, owner)?
            }
            Rule::PrecDynamic { content, .. } | Rule::Reserved { content, .. } => {
                self.expand(content, owner)?
            }
        };
        Ok(alternatives)
    }

    fn with_prec(
        &mut self,
        value: &sylva_core::Precedence,
        assoc: Assoc,
        content: &Rule,
        owner: &str,
    ) -> Result<Vec<Alternative>> {
        let prec = Prec {
            value: self.resolve_precedence(value, owner)?,
            assoc,
        };
        let mut alternatives = self.expand(content, owner)?;
        for alternative in &mut alternatives {
            alternative.prec = alternative.prec.or(Some(prec));
        }
        Ok(alternatives)
    }

    /// One-or-more repetition through a hidden left-recursive helper:
    /// `helper → helper content | content`.
    ///
    /// Empty alternatives of `content` are dropped; a repetition of nothing
    /// is nothing.
    fn repeat(&mut self, content: &Rule, owner: &str) -> Result<Vec<Alternative>> {
        let body: Vec<Alternative> = self
            .expand(content, owner)?
            .into_iter()
            .filter(|alternative| !alternative.items.is_empty())
            .collect();
        if body.is_empty() {
            return Ok(vec![Alternative::default()]);
        }

        let helper = self.repeat_symbol(owner)?;
        for alternative in body {
            let recursive = Alternative::single(helper).then(&alternative);
            self.push_production(helper, recursive);
            self.push_production(helper, alternative);
        }
        Ok(vec![Alternative::single(helper)])
    }
}

fn check_count(count: usize) -> Result<()> {
    if count > MAX_ALTERNATIVES {
        return Err(Error::TooMany {
            what: "alternatives in one rule",
            count,
        });
    }
    Ok(())
}
