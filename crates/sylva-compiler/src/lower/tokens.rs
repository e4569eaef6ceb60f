//! Token rules to regular expressions.

use sylva_core::Rule;

use super::{Lowerer, TokenDef};
use crate::{Error, Result};

impl Lowerer<'_> {
    pub(super) fn token_def(&self, rule: &Rule, owner: &str) -> Result<TokenDef> {
        let (outer_prec, body) = self.lexical_precedence(rule, owner)?;
        let (immediate, body) = match body {
            Rule::Token(content) => (false, content.as_ref()),
            Rule::ImmediateToken(content) => (true, content.as_ref()),
            other => (false, other),
        };
        let (inner_prec, body) = self.lexical_precedence(body, owner)?;
        let prec = outer_prec.or(inner_prec).unwrap_or(0);

        let mut visiting = Vec::new();
        let pattern = self.pattern(body, owner, &mut visiting)?;
        validate(&pattern, owner)?;

        Ok(TokenDef {
            pattern,
            literal: matches!(body, Rule::String(_)),
            immediate,
            prec: prec.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
        })
    }

    /// Strip precedence wrappers, returning the outermost value.
    fn lexical_precedence<'r>(&self, rule: &'r Rule, owner: &str) -> Result<(Option<i32>, &'r Rule)> {
        let mut prec = None;
        let mut current = rule;
        loop {
            match current {
                Rule::Prec { value, content }
                | Rule::PrecLeft { value, content }
                | Rule::PrecRight { value, content } => {
                    if prec.is_none() {
                        prec = Some(self.resolve_precedence(value, owner)?);
                    }
                    current = content;
                }
                Rule::PrecDynamic { content, .. } => current = content,
                _ => return Ok((prec, current)),
            }
        }
    }

    fn pattern(&self, rule: &Rule, owner: &str, visiting: &mut Vec<String>) -> Result<String> {
        let pattern = match rule {
            Rule::Blank => String::new(),
            Rule::String(value) => regex_syntax::escape(value),
            Rule::Pattern { value, flags } => {
                let flags: String = flags
                    .as_deref()
                    .unwrap_or("")
                    .chars()
                    .filter(|c| matches!(c, 'i' | 'm' | 's'))
                    .collect();
                format!("(?{flags}:{value})")
            }
            Rule::Seq(members) => members
                .iter()
                .map(|member| self.pattern(member, owner, visiting))
                .collect::<Result<String>>()?,
            Rule::Choice(members) => {
                let branches = members
                    .iter()
                    .map(|member| self.pattern(member, owner, visiting))
                    .collect::<Result<Vec<_>>>()?;
                format!("(?:{})", branches.join("|"))
            }
            Rule::Repeat(content) => format!("(?:{})*", self.pattern(content, owner, visiting)?),
            Rule::Repeat1(content) => format!("(?:{})+", self.pattern(content, owner, visiting)?),
            Rule::Symbol(name) => {
                let Some(referenced) = self.grammar.rule(name) else {
                    return Err(Error::UnknownSymbol {
                        rule: owner.to_owned(),
                        symbol: name.clone(),
                    });
                };
                if visiting.contains(name) {
                    return Err(Error::Unsupported {
                        rule: owner.to_owned(),
                        feature: "recursive tokens",
                    });
                }
                visiting.push(name.clone());
                let pattern = self.pattern(referenced, owner, visiting)?;
                visiting.pop();
                format!("(?:{pattern})")
            }
            Rule::Token(content)
            | Rule::ImmediateToken(content)
            | Rule::Field { content, .. }
            | Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. }
            | Rule::PrecDynamic { content, .. }
            | Rule::Reserved { content, .. } => self.pattern(content, owner, visiting)?,
            Rule::Alias { .. } => {
                return Err(Error::Unsupported {
                    rule: owner.to_owned(),
                    feature: "ALIAS",
                });
            }
        };
        Ok(pattern)
    }
}

/// Display name of an anonymous token: the literal text or the pattern
/// source as written in the grammar.
pub(super) fn display_name(rule: &Rule) -> Option<String> {
    match rule.without_precedence() {
        Rule::String(value) => Some(value.clone()),
        Rule::Pattern { value, .. } => Some(value.clone()),
        Rule::Token(content) | Rule::ImmediateToken(content) => display_name(content),
        _ => None,
    }
}

fn validate(pattern: &str, owner: &str) -> Result<()> {
    let hir = regex_syntax::parse(pattern).map_err(|e| Error::InvalidPattern {
        rule: owner.to_owned(),
        pattern: pattern.to_owned(),
        message: e.to_string(),
    })?;
    if hir.properties().minimum_len() == Some(0) {
        return Err(Error::EmptyToken(owner.to_owned()));
    }
    Ok(())
}
