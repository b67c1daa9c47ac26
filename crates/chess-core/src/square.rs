//! Position notation: algebraic coordinates ("e2") and their bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// One of the 64 board positions. Column `a`..`h`, row `1`..`8`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Builds a square from a column letter and a 1-based row.
    /// Returns `None` when either part is off the board.
    pub fn new(column: char, row: i32) -> Option<Self> {
        let column = column.to_ascii_lowercase();
        if !('a'..='h').contains(&column) || !(1..=8).contains(&row) {
            return None;
        }
        Some(Self {
            file: column as u8 - b'a',
            rank: (row - 1) as u8,
        })
    }

    /// `index` runs a1 = 0, b1 = 1, ... h8 = 63.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= 64 {
            return None;
        }
        Some(Self {
            file: (index % 8) as u8,
            rank: (index / 8) as u8,
        })
    }

    pub fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    pub fn column(self) -> char {
        (b'a' + self.file) as char
    }

    /// Column as a number, a = 1 through h = 8.
    pub fn column_number(self) -> i32 {
        self.file as i32 + 1
    }

    pub fn row(self) -> i32 {
        self.rank as i32 + 1
    }

    /// The square `columns` to the right and `rows` up, if it is on the board.
    pub fn offset(self, columns: i32, rows: i32) -> Option<Self> {
        let column = self.column_number() + columns;
        if !(1..=8).contains(&column) {
            return None;
        }
        Self::new((b'a' + (column - 1) as u8) as char, self.row() + rows)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column(), self.row())
    }
}

impl FromStr for Square {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

impl TryFrom<String> for Square {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse(&value)
    }
}

/// Parse a two-character square such as `"e2"` (column letter is
/// case-insensitive).
pub fn parse(square: &str) -> Result<Square, RuleError> {
    let mut chars = square.chars();
    let (Some(column), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(RuleError::InvalidFormat(format!(
            "square `{square}` must be exactly two characters"
        )));
    };
    let row = row
        .to_digit(10)
        .ok_or_else(|| RuleError::InvalidFormat(format!("square `{square}` has no row digit")))?;
    Square::new(column, row as i32)
        .ok_or_else(|| RuleError::InvalidFormat(format!("square `{square}` is off the board")))
}

/// True iff `column` is a single letter `a`..`h` and `row` is in 1..=8.
pub fn is_position_valid(column: &str, row: i32) -> bool {
    let mut chars = column.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ('a'..='h').contains(&c) && (1..=8).contains(&row),
        _ => false,
    }
}

/// True iff the column distance equals the row distance.
///
/// Zero distance (same square) also counts as diagonal.
pub fn is_diagonal(start_column: char, start_row: i32, end_column: char, end_row: i32) -> bool {
    let column_delta = (end_column as i32 - start_column as i32).abs();
    let row_delta = (end_row - start_row).abs();
    column_delta == row_delta
}
