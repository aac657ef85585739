//! Table layout planning
//!
//! Turns a classified quote grid into an ordered list of sheet edits:
//! 1. **Header**: instrument fields and days to expiry on the first row
//! 2. **Strike table**: two cells inserted on each side of every table row,
//!    filled with call/put annualized return and break-even
//! 3. **Cleanup**: metadata and junk rows deleted, bottom-up
//!
//! Every coordinate in a plan refers to the sheet as it stands when that edit
//! is applied, so edits must be applied strictly in order.

mod config;
mod planner;

pub use config::*;
pub use planner::*;

use serde::{Deserialize, Serialize};

use crate::core::{Cell, CellRef, ScreenerResult};
use crate::models::Expr;

/// Header labels of the two cells inserted left of the table
pub const LEFT_LABELS: [&str; 2] = ["ARR", "Sell C BE"];
/// Header labels of the two cells inserted right of the table
pub const RIGHT_LABELS: [&str; 2] = ["Sell P BE", "ARR"];
/// Cells inserted on each side of the table
pub const INSERTED_CELLS: u32 = 2;

/// What a write puts into a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellContent {
    Value(Cell),
    Formula(Expr),
}

impl CellContent {
    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }
}

impl From<Cell> for CellContent {
    fn from(cell: Cell) -> Self {
        CellContent::Value(cell)
    }
}

impl From<Expr> for CellContent {
    fn from(expr: Expr) -> Self {
        CellContent::Formula(expr)
    }
}

/// Side of the strike table an insertion widens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertSide {
    Left,
    Right,
}

/// One sheet edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GridEdit {
    /// Set a cell's value or formula
    Write { at: CellRef, content: CellContent },
    /// Insert `count` blank cells at `column` in rows `row..row + rows`,
    /// shifting existing cells of those rows to the right
    InsertCells {
        row: u32,
        rows: u32,
        column: u32,
        count: u32,
        side: InsertSide,
    },
    /// Copy formatting only from one cell to another
    CopyFormat { from: CellRef, to: CellRef },
    /// Apply a number format pattern
    NumberFormat { at: CellRef, pattern: String },
    /// Delete a whole row
    DeleteRow { row: u32 },
}

/// Ordered edits for the host sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub edits: Vec<GridEdit>,
}

impl LayoutPlan {
    pub fn edits(&self) -> &[GridEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Cell writes in plan order
    pub fn writes(&self) -> impl Iterator<Item = (CellRef, &CellContent)> {
        self.edits.iter().filter_map(|e| match e {
            GridEdit::Write { at, content } => Some((*at, content)),
            _ => None,
        })
    }

    /// Content written to `at`, if any (last write wins)
    pub fn write_at(&self, at: CellRef) -> Option<&CellContent> {
        self.writes().filter(|(r, _)| *r == at).map(|(_, c)| c).last()
    }

    /// Deleted rows in plan order (descending)
    pub fn deletions(&self) -> Vec<u32> {
        self.edits
            .iter()
            .filter_map(|e| match e {
                GridEdit::DeleteRow { row } => Some(*row),
                _ => None,
            })
            .collect()
    }

    /// Insertion edits in plan order
    pub fn insertions(&self) -> impl Iterator<Item = &GridEdit> {
        self.edits
            .iter()
            .filter(|e| matches!(e, GridEdit::InsertCells { .. }))
    }

    /// Pretty JSON for hosts that apply plans out of process
    pub fn to_json(&self) -> ScreenerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One-line description for logs
    pub fn summary(&self) -> String {
        let formulas = self.writes().filter(|(_, c)| c.is_formula()).count();
        format!(
            "{} edits: {} writes ({} formulas), {} insertions, {} row deletions",
            self.len(),
            self.writes().count(),
            formulas,
            self.insertions().count(),
            self.deletions().len()
        )
    }
}
