//! Text edit descriptors.

use std::ops::Range;

use crate::length::{Length, Point};

/// A replacement of `start_byte..old_end_byte` with text that now ends at
/// `new_end_byte`, with the matching row/column positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputEdit {
    pub start_byte: u32,
    pub old_end_byte: u32,
    pub new_end_byte: u32,
    pub start_position: Point,
    pub old_end_position: Point,
    pub new_end_position: Point,
}

impl InputEdit {
    /// Describe replacing `range` of `text` with `replacement`. The range is
    /// clamped to `text` and to character boundaries.
    pub fn splice(text: &str, range: Range<usize>, replacement: &str) -> Self {
        let start = Length::at(text, range.start);
        let old_end = Length::at(text, range.end.max(range.start));
        let new_end = start + Length::of(replacement);
        Self::from_lengths(start, old_end, new_end)
    }

    /// The smallest edit turning `old` into `new`: everything between their
    /// common prefix and common suffix.
    pub fn diff(old: &str, new: &str) -> Self {
        let (old_bytes, new_bytes) = (old.as_bytes(), new.as_bytes());

        let mut prefix = old_bytes
            .iter()
            .zip(new_bytes)
            .take_while(|(a, b)| a == b)
            .count();
        while !old.is_char_boundary(prefix) {
            prefix -= 1;
        }

        let limit = old.len().min(new.len()) - prefix;
        let mut suffix = old_bytes
            .iter()
            .rev()
            .zip(new_bytes.iter().rev())
            .take(limit)
            .take_while(|(a, b)| a == b)
            .count();
        while !old.is_char_boundary(old.len() - suffix) || !new.is_char_boundary(new.len() - suffix) {
            suffix -= 1;
        }

        let start = Length::at(old, prefix);
        let old_end = Length::at(old, old.len() - suffix);
        let new_end = Length::at(new, new.len() - suffix);
        Self::from_lengths(start, old_end, new_end)
    }

    fn from_lengths(start: Length, old_end: Length, new_end: Length) -> Self {
        Self {
            start_byte: start.bytes,
            old_end_byte: old_end.bytes,
            new_end_byte: new_end.bytes,
            start_position: start.extent,
            old_end_position: old_end.extent,
            new_end_position: new_end.extent,
        }
    }

    pub(crate) fn old_end(&self) -> Length {
        Length {
            bytes: self.old_end_byte,
            extent: self.old_end_position,
        }
    }

    pub(crate) fn new_end(&self) -> Length {
        Length {
            bytes: self.new_end_byte,
            extent: self.new_end_position,
        }
    }

    /// Where an old position lands after the edit. Positions inside the
    /// replaced range move to its new end.
    pub(crate) fn map(&self, position: Length) -> Length {
        if position.bytes <= self.start_byte {
            position
        } else if position.bytes >= self.old_end_byte {
            self.new_end() + (position - self.old_end())
        } else {
            self.new_end()
        }
    }

    /// Whether a node spanning `start..end` (padding included) is touched,
    /// counting the bytes its parse looked past the end.
    pub(crate) fn affects(&self, start: Length, end: Length, lookahead_bytes: u32) -> bool {
        let reach = end.bytes as u64 + lookahead_bytes as u64;
        (self.start_byte as u64) < reach && self.old_end_byte >= start.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_computes_points() {
        let text = "ab\ncd\nef";
        let edit = InputEdit::splice(text, 4..7, "X\nYZ");

        assert_eq!(edit.start_byte, 4);
        assert_eq!(edit.old_end_byte, 7);
        assert_eq!(edit.new_end_byte, 8);
        assert_eq!(edit.start_position, Point::new(1, 1));
        assert_eq!(edit.old_end_position, Point::new(2, 1));
        assert_eq!(edit.new_end_position, Point::new(2, 2));
    }

    #[test]
    fn splice_clamps_to_text() {
        let edit = InputEdit::splice("abc", 2..10, "");
        assert_eq!(edit.start_byte, 2);
        assert_eq!(edit.old_end_byte, 3);
        assert_eq!(edit.new_end_byte, 2);
    }

    #[test]
    fn diff_finds_changed_region() {
        let edit = InputEdit::diff("let x = 1;", "let xy = 1;");
        assert_eq!((edit.start_byte, edit.old_end_byte, edit.new_end_byte), (5, 5, 6));

        let edit = InputEdit::diff("abc", "abc");
        assert_eq!((edit.start_byte, edit.old_end_byte, edit.new_end_byte), (3, 3, 3));

        let edit = InputEdit::diff("aaa", "aa");
        assert_eq!((edit.start_byte, edit.old_end_byte, edit.new_end_byte), (2, 3, 2));
    }

    #[test]
    fn diff_respects_char_boundaries() {
        // 'é' and 'è' share their first byte.
        let edit = InputEdit::diff("é", "è");
        assert_eq!((edit.start_byte, edit.old_end_byte, edit.new_end_byte), (0, 2, 2));
    }

    #[test]
    fn map_shifts_positions_after_the_edit() {
        let text = "a\nbc";
        let edit = InputEdit::splice(text, 0..1, "xyz\n");
        let mapped = edit.map(Length::at(text, 3));
        assert_eq!(mapped.bytes, 6);
        assert_eq!(mapped.extent, Point::new(2, 1));
    }
}
