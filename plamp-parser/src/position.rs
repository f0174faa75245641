//! Source positions
//!
//! Positions are `(row, column)` pairs counted in characters from zero. The
//! derived ordering is row-major, which is what diagnostics and the symbol
//! table rely on when they compare or merge spans.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A location in a source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilePosition {
    pub row: u32,
    #[serde(rename = "col")]
    pub column: u32,
}

impl FilePosition {
    pub const START: FilePosition = FilePosition { row: 0, column: 0 };

    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Position of the first column of the following line
    pub fn next_line(self) -> Self {
        Self { row: self.row + 1, column: 0 }
    }

    /// Position `n` columns further along the same line
    pub fn shifted(self, n: u32) -> Self {
        Self { row: self.row, column: self.column + n }
    }
}

impl Add for FilePosition {
    type Output = FilePosition;

    fn add(self, rhs: FilePosition) -> FilePosition {
        FilePosition {
            row: self.row + rhs.row,
            column: self.column + rhs.column,
        }
    }
}

impl fmt::Display for FilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Editors count from one.
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_order() {
        let a = FilePosition::new(0, 10);
        let b = FilePosition::new(1, 0);
        let c = FilePosition::new(1, 3);

        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.max(c), c);
    }

    #[test]
    fn test_addition() {
        let sum = FilePosition::new(2, 3) + FilePosition::new(1, 4);
        assert_eq!(sum, FilePosition::new(3, 7));
    }

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(FilePosition::new(0, 0).to_string(), "1:1");
        assert_eq!(FilePosition::START.next_line().shifted(2).to_string(), "2:3");
    }
}
