//! Loading `grammar.json`.
//!
//! Rules are internally tagged by a `type` field in upper snake case.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use super::types::{Grammar, Precedence, PrecedenceEntry, Rule};

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("invalid grammar JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("grammar '{0}' defines no rules")]
    NoRules(String),
}

impl Grammar {
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let raw: RawGrammar = serde_json::from_str(json)?;
        if raw.rules.is_empty() {
            return Err(GrammarError::NoRules(raw.name));
        }
        Ok(raw.into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Deserialize)]
struct RawGrammar {
    name: String,
    rules: IndexMap<String, RawRule>,
    #[serde(default)]
    extras: Vec<RawRule>,
    #[serde(default)]
    precedences: Vec<Vec<RawPrecedenceEntry>>,
    #[serde(default)]
    conflicts: Vec<Vec<String>>,
    #[serde(default)]
    externals: Vec<RawRule>,
    #[serde(default, rename = "inline")]
    inline_rules: Vec<String>,
    #[serde(default)]
    supertypes: Vec<String>,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    reserved: IndexMap<String, Vec<RawRule>>,
}

fn rules(raw: Vec<RawRule>) -> Vec<Rule> {
    raw.into_iter().map(Rule::from).collect()
}

impl From<RawGrammar> for Grammar {
    fn from(raw: RawGrammar) -> Self {
        Self {
            name: raw.name,
            rules: raw
                .rules
                .into_iter()
                .map(|(name, rule)| (name, rule.into()))
                .collect(),
            extras: rules(raw.extras),
            precedences: raw
                .precedences
                .into_iter()
                .map(|level| level.into_iter().map(Into::into).collect())
                .collect(),
            conflicts: raw.conflicts,
            externals: rules(raw.externals),
            inline: raw.inline_rules,
            supertypes: raw.supertypes,
            word: raw.word,
            reserved: raw
                .reserved
                .into_iter()
                .map(|(context, words)| (context, rules(words)))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum RawRule {
    Blank,
    String {
        value: String,
    },
    Pattern {
        value: String,
        #[serde(default)]
        flags: Option<String>,
    },
    Symbol {
        name: String,
    },
    Seq {
        members: Vec<RawRule>,
    },
    Choice {
        members: Vec<RawRule>,
    },
    Repeat {
        content: Box<RawRule>,
    },
    Repeat1 {
        content: Box<RawRule>,
    },
    Field {
        name: String,
        content: Box<RawRule>,
    },
    Alias {
        content: Box<RawRule>,
        value: String,
        named: bool,
    },
    Token {
        content: Box<RawRule>,
    },
    ImmediateToken {
        content: Box<RawRule>,
    },
    Prec {
        value: RawPrecedence,
        content: Box<RawRule>,
    },
    PrecLeft {
        value: RawPrecedence,
        content: Box<RawRule>,
    },
    PrecRight {
        value: RawPrecedence,
        content: Box<RawRule>,
    },
    PrecDynamic {
        value: i32,
        content: Box<RawRule>,
    },
    Reserved {
        context_name: String,
        content: Box<RawRule>,
    },
}

fn boxed(raw: Box<RawRule>) -> Box<Rule> {
    Box::new(Rule::from(*raw))
}

impl From<RawRule> for Rule {
    fn from(raw: RawRule) -> Self {
        match raw {
            RawRule::Blank => Rule::Blank,
            RawRule::String { value } => Rule::String(value),
            RawRule::Pattern { value, flags } => Rule::Pattern { value, flags },
            RawRule::Symbol { name } => Rule::Symbol(name),
            RawRule::Seq { members } => Rule::Seq(rules(members)),
            RawRule::Choice { members } => Rule::Choice(rules(members)),
            RawRule::Repeat { content } => Rule::Repeat(boxed(content)),
            RawRule::Repeat1 { content } => Rule::Repeat1(boxed(content)),
            RawRule::Field { name, content } => Rule::Field {
                name,
                content: boxed(content),
            },
            RawRule::Alias {
                content,
                value,
                named,
            } => Rule::Alias {
                content: boxed(content),
                value,
                named,
            },
            RawRule::Token { content } => Rule::Token(boxed(content)),
            RawRule::ImmediateToken { content } => Rule::ImmediateToken(boxed(content)),
            RawRule::Prec { value, content } => Rule::Prec {
                value: value.into(),
                content: boxed(content),
            },
            RawRule::PrecLeft { value, content } => Rule::PrecLeft {
                value: value.into(),
                content: boxed(content),
            },
            RawRule::PrecRight { value, content } => Rule::PrecRight {
                value: value.into(),
                content: boxed(content),
            },
            RawRule::PrecDynamic { value, content } => Rule::PrecDynamic {
                value,
                content: boxed(content),
            },
            RawRule::Reserved {
                context_name,
                content,
            } => Rule::Reserved {
                context_name,
                content: boxed(content),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrecedence {
    Integer(i32),
    Name(String),
}

impl From<RawPrecedence> for Precedence {
    fn from(raw: RawPrecedence) -> Self {
        match raw {
            RawPrecedence::Integer(n) => Precedence::Integer(n),
            RawPrecedence::Name(name) => Precedence::Name(name),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum RawPrecedenceEntry {
    String { value: String },
    Symbol { name: String },
}

impl From<RawPrecedenceEntry> for PrecedenceEntry {
    fn from(raw: RawPrecedenceEntry) -> Self {
        match raw {
            RawPrecedenceEntry::String { value } => PrecedenceEntry::Name(value),
            RawPrecedenceEntry::Symbol { name } => PrecedenceEntry::Symbol(name),
        }
    }
}
