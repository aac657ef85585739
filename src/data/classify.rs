//! Row classifier
//!
//! One pass over the pasted grid tags every row with its role, gathers the
//! instrument header from the metadata rows, and marks rows for deletion.
//! A row's role depends only on its own contents and position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{cell_at, Cell, Grid, InstrumentHeader, Row};

use super::expiry::{days_between, parse_expiry_date};
use super::extract::{extract_expiry_text, extract_last_price, extract_ticker, has_numeric, row_text};

/// Role of a row in the pasted table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowRole {
    /// Row 0: instrument name and ticker
    InstrumentLine,
    /// Contains "last price"; deleted
    LastPriceLine,
    /// Starts with "calls" and carries the expiry; deleted
    CallsHeaderLine,
    /// Starts with "open interest"; header of the strike table, kept
    OpenInterestHeaderLine,
    /// Holds at least one number; kept
    DataLine,
    /// Anything else; deleted
    DiscardLine,
}

impl RowRole {
    /// Whether rows of this role are removed from the sheet
    pub fn is_deleted(&self) -> bool {
        matches!(
            self,
            RowRole::LastPriceLine | RowRole::CallsHeaderLine | RowRole::DiscardLine
        )
    }

    /// Role of a row other than row 0
    fn of(row: &[Cell]) -> Self {
        let text = row_text(row);
        if text.contains("last price") {
            RowRole::LastPriceLine
        } else if text.starts_with("calls") {
            RowRole::CallsHeaderLine
        } else if text.starts_with("open interest") {
            RowRole::OpenInterestHeaderLine
        } else if has_numeric(row) {
            RowRole::DataLine
        } else {
            RowRole::DiscardLine
        }
    }
}

/// Result of classifying a pasted grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedGrid {
    /// Instrument fields gathered from the metadata rows
    pub header: InstrumentHeader,
    /// Relative index of the strike-table header row, if any
    pub open_interest_row: Option<usize>,
    /// Absolute indices of rows to delete, ascending
    pub rows_to_delete: Vec<usize>,
    /// One role per input row
    pub roles: Vec<RowRole>,
    /// Absolute index of row 0
    pub start_row: usize,
}

impl ClassifiedGrid {
    /// Whether the relative row `index` is marked for deletion
    pub fn is_deleted(&self, index: usize) -> bool {
        self.roles.get(index).map(RowRole::is_deleted).unwrap_or(false)
    }

    /// Strike-table rows (header first) paired with their relative index
    pub fn table_rows<'a>(&self, grid: &'a Grid) -> impl Iterator<Item = (usize, &'a Row)> + 'a {
        let start = self.open_interest_row.unwrap_or(grid.len());
        grid.iter().enumerate().skip(start)
    }
}

/// Classify every row of `grid`.
///
/// `start_row` is the absolute index of row 0; `rows_to_delete` is reported
/// in the same coordinates. `today` anchors the days-to-expiry count.
pub fn classify_rows(grid: &Grid, start_row: usize, today: NaiveDate) -> ClassifiedGrid {
    let mut header = InstrumentHeader::default();
    let mut open_interest_row = None;
    let mut rows_to_delete = Vec::new();
    let mut roles = Vec::with_capacity(grid.len());

    for (i, row) in grid.iter().enumerate() {
        let role = if i == 0 {
            RowRole::InstrumentLine
        } else {
            RowRole::of(row)
        };

        match role {
            RowRole::InstrumentLine => {
                let line = cell_at(row, 0);
                header.instrument = line.display_text();
                header.ticker = extract_ticker(line);
            }
            RowRole::LastPriceLine => {
                header.last_price = extract_last_price(row);
                if header.last_price.is_none() {
                    tracing::warn!("No price found on last-price row {}", start_row + i);
                }
            }
            RowRole::CallsHeaderLine => {
                header.expiry_text = extract_expiry_text(row);
                header.expiry_date = parse_expiry_date(&header.expiry_text);
                if header.expiry_date.is_none() {
                    tracing::warn!("Unrecognized expiry {:?} on row {}", header.expiry_text, start_row + i);
                }
            }
            RowRole::OpenInterestHeaderLine => {
                if let Some(previous) = open_interest_row {
                    tracing::warn!(
                        "Repeated open interest header on row {}, replacing row {} as table header",
                        start_row + i,
                        start_row + previous
                    );
                }
                open_interest_row = Some(i);
            }
            RowRole::DataLine | RowRole::DiscardLine => {}
        }

        if role.is_deleted() {
            rows_to_delete.push(start_row + i);
        }

        tracing::debug!("Row {} classified as {:?}", start_row + i, role);
        roles.push(role);
    }

    header.days_to_expiry = header.expiry_date.map(|d| days_between(d, today));

    ClassifiedGrid {
        header,
        open_interest_row,
        rows_to_delete,
        roles,
        start_row,
    }
}
