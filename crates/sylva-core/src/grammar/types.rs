//! Grammar type definitions.

use indexmap::IndexMap;

/// An evaluated tree-sitter grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub name: String,
    /// Rules in definition order. The first rule is the start rule.
    pub rules: IndexMap<String, Rule>,
    /// Tokens allowed anywhere between other tokens (whitespace, comments).
    pub extras: Vec<Rule>,
    /// Named precedence orderings, highest first.
    pub precedences: Vec<Vec<PrecedenceEntry>>,
    /// Declared GLR conflicts. Parsed but not used: tables are deterministic.
    pub conflicts: Vec<Vec<String>>,
    pub externals: Vec<Rule>,
    pub inline: Vec<String>,
    pub supertypes: Vec<String>,
    /// Keyword extraction rule. Accepted for compatibility.
    pub word: Option<String>,
    pub reserved: IndexMap<String, Vec<Rule>>,
}

impl Grammar {
    /// The rule a parse starts from.
    pub fn start_rule(&self) -> Option<(&str, &Rule)> {
        self.rules.first().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Hidden rules never produce their own node; their children are
    /// spliced into the parent.
    pub fn is_hidden_rule(&self, name: &str) -> bool {
        name.starts_with('_')
            || self.inline.iter().any(|n| n == name)
            || self.supertypes.iter().any(|n| n == name)
    }
}

/// Grammar rule variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Blank,
    String(String),
    Pattern {
        value: String,
        flags: Option<String>,
    },
    Symbol(String),
    Seq(Vec<Rule>),
    Choice(Vec<Rule>),
    Repeat(Box<Rule>),
    Repeat1(Box<Rule>),
    Field {
        name: String,
        content: Box<Rule>,
    },
    Alias {
        content: Box<Rule>,
        value: String,
        named: bool,
    },
    Token(Box<Rule>),
    ImmediateToken(Box<Rule>),
    Prec {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecLeft {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecRight {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecDynamic {
        value: i32,
        content: Box<Rule>,
    },
    Reserved {
        context_name: String,
        content: Box<Rule>,
    },
}

impl Rule {
    /// Rule with any precedence wrappers removed.
    pub fn without_precedence(&self) -> &Rule {
        match self {
            Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. }
            | Rule::PrecDynamic { content, .. } => content.without_precedence(),
            other => other,
        }
    }

    /// Whether the rule describes a single token rather than structure.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self.without_precedence(),
            Rule::String(_) | Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_)
        )
    }
}

/// Precedence value, numeric or a name from `precedences`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precedence {
    Integer(i32),
    Name(String),
}

/// Entry in a named precedence ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrecedenceEntry {
    Name(String),
    Symbol(String),
}
