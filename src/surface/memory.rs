//! In-memory sheet
//!
//! Holds cell contents and formatting in a row-major store and applies plan
//! edits with spreadsheet semantics. Formulas are evaluated on read.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::{Cell, CellRef, Grid, Origin, ScreenerError, ScreenerResult};
use crate::layout::{CellContent, GridEdit};

use super::GridSurface;

/// One sheet cell: content plus formatting
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub content: CellContent,
    /// Opaque style tag (font, fill, borders) copied by format-only copies
    pub style: Option<String>,
    pub number_format: Option<String>,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            content: CellContent::Value(Cell::Empty),
            style: None,
            number_format: None,
        }
    }
}

/// Sheet held in memory; row and column 1 are index 0
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    rows: Vec<Vec<Slot>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet holding `grid` with its top-left cell at `origin`
    pub fn from_grid(grid: &Grid, origin: Origin) -> ScreenerResult<Self> {
        check(origin)?;
        let mut surface = Self::new();
        for (i, row) in grid.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                let at = CellRef::new(origin.row + i as u32, origin.col + j as u32);
                surface.slot_mut(at).content = CellContent::Value(cell.clone());
            }
        }
        Ok(surface)
    }

    /// Number of rows currently held
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn slot(&self, at: CellRef) -> Option<&Slot> {
        if at.row == 0 || at.col == 0 {
            return None;
        }
        self.rows
            .get(at.row as usize - 1)
            .and_then(|r| r.get(at.col as usize - 1))
    }

    pub fn content(&self, at: CellRef) -> Option<&CellContent> {
        self.slot(at).map(|s| &s.content)
    }

    pub fn number_format(&self, at: CellRef) -> Option<&str> {
        self.slot(at).and_then(|s| s.number_format.as_deref())
    }

    pub fn style(&self, at: CellRef) -> Option<&str> {
        self.slot(at).and_then(|s| s.style.as_deref())
    }

    /// Tag a cell with a style, as if formatted by the user
    pub fn set_style(&mut self, at: CellRef, style: impl Into<String>) -> ScreenerResult<()> {
        check(at)?;
        self.slot_mut(at).style = Some(style.into());
        Ok(())
    }

    /// Displayed value of a cell, formulas evaluated as of `today`.
    ///
    /// A reference back into a formula still being evaluated (a cycle)
    /// reads as empty.
    pub fn value(&self, at: CellRef, today: NaiveDate) -> Cell {
        self.evaluate(at, today, &RefCell::new(HashMap::new()))
    }

    /// `None` in `memo` marks a cell on the current evaluation stack
    fn evaluate(
        &self,
        at: CellRef,
        today: NaiveDate,
        memo: &RefCell<HashMap<CellRef, Option<Cell>>>,
    ) -> Cell {
        let expr = match self.content(at) {
            None => return Cell::Empty,
            Some(CellContent::Value(cell)) => return cell.clone(),
            Some(CellContent::Formula(expr)) => expr,
        };

        let state = memo.borrow().get(&at).cloned();
        match state {
            Some(Some(done)) => return done,
            Some(None) => {
                tracing::debug!("Circular reference through {}", at);
                return Cell::Empty;
            }
            None => {}
        }

        memo.borrow_mut().insert(at, None);
        let result = expr.eval(&|r| self.evaluate(r, today, memo), today);
        memo.borrow_mut().insert(at, Some(result.clone()));
        result
    }

    /// Evaluated sheet from row 1 / column 1, trailing cells of each row as stored
    pub fn read_grid(&self, today: NaiveDate) -> Grid {
        let memo = RefCell::new(HashMap::new());
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                (0..row.len())
                    .map(|j| self.evaluate(CellRef::new(i as u32 + 1, j as u32 + 1), today, &memo))
                    .collect()
            })
            .collect()
    }

    /// Rewrite every formula reference, as the host does when cells move
    fn move_refs(&mut self, f: &mut dyn FnMut(&mut CellRef)) {
        for slot in self.rows.iter_mut().flatten() {
            if let CellContent::Formula(expr) = &mut slot.content {
                expr.refs_mut(f);
            }
        }
    }

    fn slot_mut(&mut self, at: CellRef) -> &mut Slot {
        let (r, c) = (at.row as usize - 1, at.col as usize - 1);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let row = &mut self.rows[r];
        if row.len() <= c {
            row.resize_with(c + 1, Slot::default);
        }
        &mut row[c]
    }
}

fn check(at: CellRef) -> ScreenerResult<()> {
    if at.row == 0 || at.col == 0 {
        return Err(ScreenerError::surface(format!(
            "Coordinates are 1-based, got row {} col {}",
            at.row, at.col
        )));
    }
    Ok(())
}

impl GridSurface for MemorySurface {
    fn apply(&mut self, edit: &GridEdit) -> ScreenerResult<()> {
        match edit {
            GridEdit::Write { at, content } => {
                check(*at)?;
                self.slot_mut(*at).content = content.clone();
            }
            GridEdit::InsertCells { row, rows, column, count, .. } => {
                check(CellRef::new(*row, *column))?;
                for r in *row..*row + *rows {
                    // Materialize the row up to the insertion point, then shift
                    let anchor = CellRef::new(r, *column);
                    self.slot_mut(anchor);
                    let cells = &mut self.rows[r as usize - 1];
                    let at = *column as usize - 1;
                    cells.splice(at..at, (0..*count).map(|_| Slot::default()));
                }
                let (first, last, column, count) = (*row, *row + *rows, *column, *count);
                self.move_refs(&mut |at: &mut CellRef| {
                    if (first..last).contains(&at.row) && at.col >= column {
                        at.col += count;
                    }
                });
            }
            GridEdit::CopyFormat { from, to } => {
                check(*from)?;
                check(*to)?;
                let source = self.slot(*from).cloned().unwrap_or_default();
                let target = self.slot_mut(*to);
                target.style = source.style;
                target.number_format = source.number_format;
            }
            GridEdit::NumberFormat { at, pattern } => {
                check(*at)?;
                self.slot_mut(*at).number_format = Some(pattern.clone());
            }
            GridEdit::DeleteRow { row } => {
                if *row == 0 {
                    return Err(ScreenerError::surface("Cannot delete row 0"));
                }
                let index = *row as usize - 1;
                if index < self.rows.len() {
                    self.rows.remove(index);
                }
                // References into the deleted row dangle and read as empty
                let deleted = *row;
                self.move_refs(&mut |at: &mut CellRef| {
                    if at.row == deleted {
                        at.row = 0;
                    } else if at.row > deleted {
                        at.row -= 1;
                    }
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::InsertSide;
    use crate::models::Expr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    fn n(v: f64) -> Cell {
        Cell::Number(v)
    }

    #[test]
    fn test_from_grid_at_origin() {
        let grid = vec![vec![n(1.0), n(2.0)], vec![n(3.0)]];
        let surface = MemorySurface::from_grid(&grid, CellRef::new(2, 3)).unwrap();

        assert_eq!(surface.value(CellRef::new(2, 3), today()), n(1.0));
        assert_eq!(surface.value(CellRef::new(2, 4), today()), n(2.0));
        assert_eq!(surface.value(CellRef::new(3, 3), today()), n(3.0));
        assert_eq!(surface.value(CellRef::new(1, 1), today()), Cell::Empty);
        assert!(MemorySurface::from_grid(&grid, CellRef::new(0, 1)).is_err());
    }

    #[test]
    fn test_insert_cells_shifts_only_target_rows() {
        let grid = vec![vec![n(1.0), n(2.0)], vec![n(3.0), n(4.0)]];
        let mut surface = MemorySurface::from_grid(&grid, CellRef::new(1, 1)).unwrap();

        surface
            .apply(&GridEdit::InsertCells { row: 2, rows: 1, column: 1, count: 2, side: InsertSide::Left })
            .unwrap();

        assert_eq!(surface.read_grid(today()), vec![
            vec![n(1.0), n(2.0)],
            vec![Cell::Empty, Cell::Empty, n(3.0), n(4.0)],
        ]);
    }

    #[test]
    fn test_insert_past_row_end() {
        let mut surface = MemorySurface::from_grid(&vec![vec![n(1.0)]], CellRef::new(1, 1)).unwrap();
        surface
            .apply(&GridEdit::InsertCells { row: 1, rows: 1, column: 4, count: 2, side: InsertSide::Right })
            .unwrap();
        surface
            .apply(&GridEdit::Write { at: CellRef::new(1, 4), content: CellContent::Value(n(9.0)) })
            .unwrap();

        assert_eq!(surface.value(CellRef::new(1, 4), today()), n(9.0));
        assert_eq!(surface.value(CellRef::new(1, 1), today()), n(1.0));
    }

    #[test]
    fn test_delete_row() {
        let grid = vec![vec![n(1.0)], vec![n(2.0)], vec![n(3.0)]];
        let mut surface = MemorySurface::from_grid(&grid, CellRef::new(1, 1)).unwrap();

        surface.apply(&GridEdit::DeleteRow { row: 2 }).unwrap();
        assert_eq!(surface.read_grid(today()), vec![vec![n(1.0)], vec![n(3.0)]]);

        // Past the populated rows nothing moves
        surface.apply(&GridEdit::DeleteRow { row: 40 }).unwrap();
        assert_eq!(surface.row_count(), 2);

        assert!(matches!(
            surface.apply(&GridEdit::DeleteRow { row: 0 }),
            Err(ScreenerError::Surface(_))
        ));
    }

    #[test]
    fn test_copy_format_only() {
        let grid = vec![vec![n(1.0), n(2.0)]];
        let mut surface = MemorySurface::from_grid(&grid, CellRef::new(1, 1)).unwrap();
        let (a, b) = (CellRef::new(1, 1), CellRef::new(1, 2));

        surface.set_style(a, "bold").unwrap();
        surface.apply(&GridEdit::NumberFormat { at: a, pattern: "0.00".into() }).unwrap();
        surface.apply(&GridEdit::CopyFormat { from: a, to: b }).unwrap();

        assert_eq!(surface.style(b), Some("bold"));
        assert_eq!(surface.number_format(b), Some("0.00"));
        assert_eq!(surface.value(b, today()), n(2.0));
    }

    #[test]
    fn test_formula_chain() {
        let mut surface = MemorySurface::new();
        let expiry = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        let (e, t, d) = (CellRef::new(1, 1), CellRef::new(1, 2), CellRef::new(1, 3));

        surface.apply(&GridEdit::Write { at: e, content: CellContent::Value(Cell::Date(expiry)) }).unwrap();
        surface.apply(&GridEdit::Write { at: t, content: CellContent::Formula(Expr::Today) }).unwrap();
        surface
            .apply(&GridEdit::Write {
                at: d,
                content: CellContent::Formula(Expr::sub(Expr::cell(e), Expr::cell(t))),
            })
            .unwrap();

        assert_eq!(surface.value(d, today()), n(14.0));
    }

    #[test]
    fn test_formulas_follow_moved_cells() {
        let grid = vec![vec![n(10.0)], vec![Cell::text("junk")], vec![n(2.0), n(5.0)]];
        let mut surface = MemorySurface::from_grid(&grid, CellRef::new(1, 1)).unwrap();
        let be = Expr::break_even(Expr::cell(CellRef::new(3, 1)), Expr::cell(CellRef::new(1, 1)));
        let at = CellRef::new(3, 3);
        surface.apply(&GridEdit::Write { at, content: CellContent::Formula(be) }).unwrap();

        surface
            .apply(&GridEdit::InsertCells { row: 3, rows: 1, column: 1, count: 2, side: InsertSide::Left })
            .unwrap();
        surface.apply(&GridEdit::DeleteRow { row: 2 }).unwrap();

        // The formula moved to E2 and its strike reference followed to C2
        match surface.content(CellRef::new(2, 5)) {
            Some(CellContent::Formula(e)) => assert_eq!(e.formula_text(), "=BREAK_EVEN(C2,A1)"),
            other => panic!("expected formula, got {:?}", other),
        }
        assert_eq!(surface.value(CellRef::new(2, 5), today()), n(-8.0));

        surface.apply(&GridEdit::DeleteRow { row: 1 }).unwrap();
        assert_eq!(surface.value(CellRef::new(1, 5), today()), Cell::Empty);
    }

    #[test]
    fn test_self_reference_reads_empty() {
        let mut surface = MemorySurface::new();
        let a = CellRef::new(1, 1);
        let looping = Expr::break_even(Expr::cell(a), Expr::cell(a));
        surface.apply(&GridEdit::Write { at: a, content: CellContent::Formula(looping) }).unwrap();

        assert_eq!(surface.value(a, today()), Cell::Empty);
    }

    #[test]
    fn test_cycles_resolve_immediately() {
        let mut surface = MemorySurface::new();
        let (a, b, c) = (CellRef::new(1, 1), CellRef::new(1, 2), CellRef::new(1, 3));
        let r = Expr::cell;
        surface
            .apply(&GridEdit::Write {
                at: a,
                content: CellContent::Formula(Expr::annualized_return(r(a), r(b), r(a))),
            })
            .unwrap();
        surface
            .apply(&GridEdit::Write {
                at: b,
                content: CellContent::Formula(Expr::annualized_return(r(a), r(b), r(c))),
            })
            .unwrap();
        surface
            .apply(&GridEdit::Write { at: c, content: CellContent::Formula(Expr::break_even(r(c), r(a))) })
            .unwrap();

        let started = std::time::Instant::now();
        assert_eq!(surface.value(a, today()), Cell::Empty);
        assert_eq!(surface.value(b, today()), Cell::Empty);
        assert_eq!(surface.read_grid(today()), vec![vec![Cell::Empty; 3]]);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_shared_operands_evaluate_once() {
        // Each level doubles the references to the level below
        let mut surface = MemorySurface::new();
        surface
            .apply(&GridEdit::Write { at: CellRef::new(1, 1), content: CellContent::Value(n(1.0)) })
            .unwrap();
        for row in 2..=40 {
            let below = Expr::cell(CellRef::new(row - 1, 1));
            let formula = Expr::min([below.clone(), below]);
            surface
                .apply(&GridEdit::Write { at: CellRef::new(row, 1), content: CellContent::Formula(formula) })
                .unwrap();
        }

        let started = std::time::Instant::now();
        assert_eq!(surface.value(CellRef::new(40, 1), today()), n(1.0));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }
}
