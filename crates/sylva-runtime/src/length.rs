//! Byte lengths paired with row/column extents.

use std::ops::{Add, AddAssign, Sub};

use serde::Serialize;

/// Zero-based row and byte column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    pub const ZERO: Point = Point { row: 0, column: 0 };

    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// A span length (or absolute position, measured from the start of input).
///
/// Adding lengths concatenates spans: when the right side crosses a newline,
/// the column restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Length {
    pub bytes: u32,
    pub extent: Point,
}

impl Length {
    pub const ZERO: Length = Length {
        bytes: 0,
        extent: Point::ZERO,
    };

    /// Length of a piece of text.
    pub fn of(text: &str) -> Self {
        let mut extent = Point::ZERO;
        for byte in text.bytes() {
            if byte == b'\n' {
                extent.row += 1;
                extent.column = 0;
            } else {
                extent.column += 1;
            }
        }
        Length {
            bytes: text.len() as u32,
            extent,
        }
    }

    /// Position of `byte` inside `text`, clamped to the text.
    pub fn at(text: &str, byte: usize) -> Self {
        let end = floor_char_boundary(text, byte.min(text.len()));
        Self::of(&text[..end])
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        let extent = if rhs.extent.row > 0 {
            Point::new(self.extent.row + rhs.extent.row, rhs.extent.column)
        } else {
            Point::new(self.extent.row, self.extent.column + rhs.extent.column)
        };
        Length {
            bytes: self.bytes + rhs.bytes,
            extent,
        }
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Length) {
        *self = *self + rhs;
    }
}

impl Sub for Length {
    type Output = Length;

    /// `self - rhs` for `rhs <= self`; saturates otherwise.
    fn sub(self, rhs: Length) -> Length {
        let extent = if self.extent.row > rhs.extent.row {
            Point::new(self.extent.row - rhs.extent.row, self.extent.column)
        } else {
            Point::new(0, self.extent.column.saturating_sub(rhs.extent.column))
        };
        Length {
            bytes: self.bytes.saturating_sub(rhs.bytes),
            extent,
        }
    }
}
