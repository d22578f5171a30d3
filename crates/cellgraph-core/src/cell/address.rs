//! A1-style cell addresses

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address within a single sheet (e.g., "A1", "$B$2")
///
/// Rows run 1-1048576 and columns A-XFD in A1 notation. Internally both are
/// 0-based. The `$` markers are kept so that shared formulas can be
/// translated, but they never affect which cell the address denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a new cell address with relative references
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Create a new cell address with specified absolute/relative flags
    pub fn with_absolute(row: u32, col: u16, row_absolute: bool, col_absolute: bool) -> Self {
        Self {
            row,
            col,
            row_absolute,
            col_absolute,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use cellgraph_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.row, addr.col), (0, 0));
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!((addr.row, addr.col), (1, 1));
    /// assert!(addr.row_absolute && addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = |why: &str| Error::InvalidAddress(format!("{} in '{}'", why, text));

        let (col_absolute, rest) = match text.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let split = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let (letters, rest) = rest.split_at(split);
        if letters.is_empty() {
            return Err(invalid("no column letters"));
        }
        let col = Self::letters_to_column(letters)?;

        let (row_absolute, digits) = match rest.strip_prefix('$') {
            Some(digits) => (true, digits),
            None => (false, rest),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("invalid row number"));
        }
        // 1-based in A1 notation; overflow means far past the last row anyway
        let row = match digits.parse::<u32>() {
            Ok(0) => return Err(invalid("row number must be >= 1")),
            Ok(n) => n - 1,
            Err(_) => return Err(Error::RowOutOfBounds(u32::MAX, MAX_ROWS - 1)),
        };
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self::with_absolute(row, col, row_absolute, col_absolute))
    }

    /// Column letters for a 0-based index (0 = A, 25 = Z, 26 = AA)
    pub fn column_to_letters(col: u16) -> String {
        // Bijective base 26: there is no zero digit
        let mut n = u32::from(col) + 1;
        let mut reversed = String::with_capacity(3);
        while n > 0 {
            let digit = ((n - 1) % 26) as u8;
            reversed.push(char::from(b'A' + digit));
            n = (n - 1) / 26;
        }
        reversed.chars().rev().collect()
    }

    /// 0-based column index of some letters, case-insensitive (A = 0, AA = 26)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }
        // Three letters reach XFD, the last column
        if letters.len() > 3 {
            return Err(Error::InvalidAddress(format!("column '{}' out of range", letters)));
        }

        let value = letters.bytes().try_fold(0u32, |acc, b| {
            if b.is_ascii_alphabetic() {
                Ok(acc * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1)
            } else {
                Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    char::from(b)
                )))
            }
        })?;

        // At most ZZZ, well inside u16
        let col = (value - 1) as u16;
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(col)
    }

    /// Shift the relative parts of this address by the given deltas
    ///
    /// Absolute components stay fixed. Returns `None` when the shifted
    /// address would fall off the grid.
    pub fn offset(&self, rows: i64, cols: i64) -> Option<CellAddress> {
        let shift = |value: i64, by: i64, absolute: bool| if absolute { value } else { value + by };
        let row = shift(i64::from(self.row), rows, self.row_absolute);
        let col = shift(i64::from(self.col), cols, self.col_absolute);

        let row = u32::try_from(row).ok().filter(|&r| r < MAX_ROWS)?;
        let col = u16::try_from(col).ok().filter(|&c| c < MAX_COLS)?;
        Some(Self::with_absolute(row, col, self.row_absolute, self.col_absolute))
    }

    /// Format as A1-style string, keeping `$` markers
    pub fn to_a1_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col_marker = if self.col_absolute { "$" } else { "" };
        let row_marker = if self.row_absolute { "$" } else { "" };
        write!(
            f,
            "{}{}{}{}",
            col_marker,
            Self::column_to_letters(self.col),
            row_marker,
            self.row + 1
        )
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
