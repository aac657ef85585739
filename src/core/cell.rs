//! Grid cells and sheet coordinates
//!
//! A pasted quote table arrives as a ragged grid of text, numbers and blanks.
//! Coordinates are absolute, 1-based sheet positions rendered in A1 notation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single grid cell.
///
/// Pasted input only ever holds `Empty`, `Number` and `Text`. `Date` is
/// written by layout plans (the parsed expiry) and read back from surfaces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

/// One row of the grid. Rows may differ in length.
pub type Row = Vec<Cell>;

/// The pasted table, row-major.
pub type Grid = Vec<Row>;

pub(crate) static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Numeric value, only for finite numbers
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Cell rendered as plain text, the way a row is joined for matching
    pub fn display_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Empty)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d)
    }
}

/// Cell at `index` of a possibly short row; missing cells read as empty.
pub fn cell_at(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&EMPTY_CELL)
}

/// Absolute sheet position, 1-based like the host spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

/// Top-left cell of the pasted selection
pub type Origin = CellRef;

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Same row, `cols` columns to the right
    pub fn right(self, cols: u32) -> Self {
        Self { row: self.row, col: self.col + cols }
    }

    /// Same column, `rows` rows down
    pub fn down(self, rows: u32) -> Self {
        Self { row: self.row + rows, col: self.col }
    }

    /// A1 notation, e.g. `J12`
    pub fn a1(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row)
    }
}

/// Convert 1-based column index to letters (1 -> A, 27 -> AA)
pub fn col_to_letters(mut col: u32) -> String {
    let mut s = String::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        s.push((b'A' + rem) as char);
        col = (col - 1) / 26;
    }
    s.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_letters() {
        assert_eq!(col_to_letters(1), "A");
        assert_eq!(col_to_letters(26), "Z");
        assert_eq!(col_to_letters(27), "AA");
        assert_eq!(col_to_letters(52), "AZ");
        assert_eq!(col_to_letters(703), "AAA");
        assert_eq!(CellRef::new(12, 10).a1(), "J12");
        assert_eq!(CellRef::new(3, 2).right(2).down(1).to_string(), "D4");
    }

    #[test]
    fn test_number_only_when_finite() {
        assert_eq!(Cell::Number(1.5).as_number(), Some(1.5));
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
        assert_eq!(Cell::Number(f64::INFINITY).as_number(), None);
        assert_eq!(Cell::text("100").as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Cell::Number(100.0).display_text(), "100");
        assert_eq!(Cell::Number(1.28).display_text(), "1.28");
        assert_eq!(Cell::Empty.display_text(), "");
        let d = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        assert_eq!(Cell::Date(d).display_text(), "2025-08-15");
    }

    #[test]
    fn test_short_rows_read_empty() {
        let row = vec![Cell::text("CALLS")];
        assert_eq!(cell_at(&row, 0), &Cell::text("CALLS"));
        assert!(cell_at(&row, 9).is_empty());
    }

    #[test]
    fn test_json_grid() {
        let grid: Grid = serde_json::from_str(r#"[["AAPL"], ["100", 1, 2.5, null]]"#).unwrap();
        assert_eq!(grid[0], vec![Cell::text("AAPL")]);
        assert_eq!(
            grid[1],
            vec![Cell::text("100"), Cell::Number(1.0), Cell::Number(2.5), Cell::Empty]
        );
    }
}
