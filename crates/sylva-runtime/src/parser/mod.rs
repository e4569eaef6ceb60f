//! Table-driven LR parsing with error recovery and subtree reuse.

mod driver;
mod recovery;
mod reusable;
mod stack;
mod trace;

#[cfg(test)]
mod trace_tests;

use std::io::Read;
use std::sync::Arc;

use sylva_table::GrammarTable;

pub use trace::{NoopTracer, PrintTracer, Recovery, Tracer, Verbosity};

use crate::edit::InputEdit;
use crate::error::ParseError;
use crate::tree::Tree;
use driver::Driver;

/// Counters for the most recent parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Tokens produced by the lexer.
    pub tokens_lexed: usize,
    /// Subtrees (leaves included) taken over from the old tree.
    pub nodes_reused: usize,
    /// Bytes covered by reused subtrees, padding included.
    pub bytes_reused: usize,
    /// Times error recovery ran.
    pub recoveries: usize,
}

/// Parses text against one grammar table.
///
/// A parser holds no per-parse state besides the statistics of its last
/// run; use one parser per thread.
pub struct Parser {
    table: Arc<GrammarTable>,
    stats: ParseStats,
}

impl Parser {
    pub fn new(table: Arc<GrammarTable>) -> Self {
        Self {
            table,
            stats: ParseStats::default(),
        }
    }

    pub fn table(&self) -> &Arc<GrammarTable> {
        &self.table
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Parse `text`. With `old_tree` (already edited to match `text`),
    /// unchanged subtrees are reused; the result is the same as a parse
    /// without it.
    pub fn parse(&mut self, text: &str, old_tree: Option<&Tree>) -> Result<Tree, ParseError> {
        self.parse_with_tracer(text, old_tree, &mut NoopTracer)
    }

    pub fn parse_with_tracer<T: Tracer>(
        &mut self,
        text: &str,
        old_tree: Option<&Tree>,
        tracer: &mut T,
    ) -> Result<Tree, ParseError> {
        if u32::try_from(text.len()).is_err() {
            return Err(ParseError::InputTooLarge(text.len()));
        }

        let old_root = old_tree.and_then(|tree| {
            if Arc::ptr_eq(tree.table(), &self.table) {
                Some(tree.root())
            } else {
                tracing::debug!("old tree belongs to another grammar table; parsing from scratch");
                None
            }
        });

        let driver = Driver::new(&self.table, text, old_root, tracer);
        let (root, stats) = driver.run();
        self.stats = stats;

        tracing::debug!(
            bytes = text.len(),
            tokens = stats.tokens_lexed,
            reused = stats.nodes_reused,
            recoveries = stats.recoveries,
            "parsed"
        );
        Ok(Tree::new(root, Arc::clone(&self.table)))
    }

    pub fn parse_bytes(&mut self, bytes: &[u8], old_tree: Option<&Tree>) -> Result<Tree, ParseError> {
        let text = std::str::from_utf8(bytes)?;
        self.parse(text, old_tree)
    }

    pub fn parse_reader(&mut self, mut reader: impl Read, old_tree: Option<&Tree>) -> Result<Tree, ParseError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes, old_tree)
    }

    /// Parse text delivered in pieces. Chunk boundaries may fall anywhere,
    /// even inside a character.
    pub fn parse_chunks<I, B>(&mut self, chunks: I, old_tree: Option<&Tree>) -> Result<Tree, ParseError>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut bytes = Vec::new();
        for chunk in chunks {
            bytes.extend_from_slice(chunk.as_ref());
        }
        self.parse_bytes(&bytes, old_tree)
    }

    /// Apply `edit` to `old_tree` and parse `text`, the edited source.
    pub fn reparse(&mut self, old_tree: &Tree, edit: &InputEdit, text: &str) -> Result<Tree, ParseError> {
        let edited = old_tree.edit(edit);
        self.parse(text, Some(&edited))
    }
}
