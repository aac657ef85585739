//! LayoutPlanner - builds the edit list for a classified grid

use crate::core::{
    Cell, CellRef, Grid, Origin, ScreenerError, ScreenerResult, StrikeRow, CALL_BID_COLUMN,
    PUT_BID_COLUMN, STRIKE_COLUMN,
};
use crate::data::ClassifiedGrid;
use crate::models::{Expr, StrikeMetrics};

use super::{
    CellContent, GridEdit, InsertSide, InsertionGranularity, LayoutConfig, LayoutPlan,
    INSERTED_CELLS, LEFT_LABELS, RIGHT_LABELS,
};

/// Header fields written before the days-to-expiry cell
const HEADER_FIELDS: u32 = 5;

/// Plans the sheet edits for one pasted chain
pub struct LayoutPlanner {
    config: LayoutConfig,
}

impl Default for LayoutPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutPlanner {
    /// Create a planner with default configuration
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Plan the edits for `grid`, pasted with its top-left cell at `origin`.
    ///
    /// Fails when the grid has no usable Open-Interest header: without it the
    /// strike table cannot be located and no partial plan is produced.
    pub fn plan(
        &self,
        classified: &ClassifiedGrid,
        grid: &Grid,
        origin: Origin,
    ) -> ScreenerResult<LayoutPlan> {
        validate(classified, grid, origin)?;

        let table_start = match classified.open_interest_row {
            Some(0) => {
                return Err(ScreenerError::structure(
                    "Open Interest header is on the instrument line (row 0)",
                ))
            }
            Some(index) => index,
            None => {
                return Err(ScreenerError::structure(
                    "No row starting with 'Open Interest' found in the selection",
                ))
            }
        };

        let mut builder = PlanBuilder::new(&self.config, origin);
        let header_cells = builder.header(classified);

        let table: Vec<(usize, &Vec<Cell>)> = classified.table_rows(grid).collect();
        let width = table.iter().map(|(_, row)| row.len()).max().unwrap_or(0) as u32;
        let geometry = TableGeometry::new(origin, width);

        if self.config.insertion == InsertionGranularity::PerTable {
            builder.insert(&geometry, to_row(origin, table_start)?, table.len() as u32);
        }

        for (index, row) in &table {
            if classified.is_deleted(*index) {
                continue;
            }

            let sheet_row = to_row(origin, *index)?;
            if self.config.insertion == InsertionGranularity::PerRow {
                builder.insert(&geometry, sheet_row, 1);
            }

            if *index == table_start {
                builder.table_header(&geometry, sheet_row);
            } else {
                builder.strike_row(&geometry, sheet_row, row, classified, header_cells);
            }
        }

        for &row in classified.rows_to_delete.iter().rev() {
            builder.push(GridEdit::DeleteRow { row: absolute(row)? });
        }

        let plan = builder.finish();
        tracing::info!(
            "Planned layout for {:?}: {} table rows, {}",
            classified.header.ticker,
            table.len(),
            plan.summary()
        );
        Ok(plan)
    }
}

/// Plan the edits for `grid` with the given configuration
pub fn plan_layout(
    classified: &ClassifiedGrid,
    grid: &Grid,
    origin: Origin,
    config: &LayoutConfig,
) -> ScreenerResult<LayoutPlan> {
    LayoutPlanner::with_config(config.clone()).plan(classified, grid, origin)
}

fn validate(classified: &ClassifiedGrid, grid: &Grid, origin: Origin) -> ScreenerResult<()> {
    if origin.row == 0 || origin.col == 0 {
        return Err(ScreenerError::invalid_input(format!(
            "Origin must be 1-based, got row {} col {}",
            origin.row, origin.col
        )));
    }
    if classified.roles.len() != grid.len() {
        return Err(ScreenerError::invalid_input(format!(
            "Classification covers {} rows but the grid has {}",
            classified.roles.len(),
            grid.len()
        )));
    }
    if classified.start_row != origin.row as usize {
        return Err(ScreenerError::invalid_input(format!(
            "Grid was classified from row {} but is planned at row {}",
            classified.start_row, origin.row
        )));
    }
    Ok(())
}

fn absolute(row: usize) -> ScreenerResult<u32> {
    u32::try_from(row).map_err(|_| ScreenerError::invalid_input(format!("Row {} out of range", row)))
}

fn to_row(origin: Origin, index: usize) -> ScreenerResult<u32> {
    absolute(origin.row as usize + index)
}

/// Column positions of the strike table once both insertions are applied
struct TableGeometry {
    /// First inserted column on the left
    left: u32,
    /// First original data column
    data: u32,
    /// First inserted column on the right
    right: u32,
}

impl TableGeometry {
    fn new(origin: Origin, width: u32) -> Self {
        let data = origin.col + INSERTED_CELLS;
        Self {
            left: origin.col,
            data,
            right: data + width,
        }
    }

    /// Original data column `offset` on `row`
    fn data_cell(&self, row: u32, offset: usize) -> CellRef {
        CellRef::new(row, self.data + offset as u32)
    }
}

/// Where the days-to-expiry and last-price values live on the header row
#[derive(Clone, Copy)]
struct HeaderCells {
    last_price: CellRef,
    days: CellRef,
}

struct PlanBuilder<'a> {
    config: &'a LayoutConfig,
    origin: Origin,
    edits: Vec<GridEdit>,
}

impl<'a> PlanBuilder<'a> {
    fn new(config: &'a LayoutConfig, origin: Origin) -> Self {
        Self {
            config,
            origin,
            edits: Vec::new(),
        }
    }

    fn push(&mut self, edit: GridEdit) {
        self.edits.push(edit);
    }

    fn write(&mut self, at: CellRef, content: impl Into<CellContent>) {
        self.push(GridEdit::Write {
            at,
            content: content.into(),
        });
    }

    fn finish(self) -> LayoutPlan {
        LayoutPlan { edits: self.edits }
    }

    /// Instrument fields, then days to expiry right after them
    fn header(&mut self, classified: &ClassifiedGrid) -> HeaderCells {
        let header = &classified.header;
        for (k, cell) in header.cells().into_iter().enumerate() {
            self.write(self.origin.right(k as u32), cell);
        }

        let expiry = self.origin.right(HEADER_FIELDS - 1);
        let days = if self.config.emit_formulas {
            let today = self.origin.right(HEADER_FIELDS);
            let days = self.origin.right(HEADER_FIELDS + 1);
            self.write(today, Expr::Today);
            self.write(days, Expr::sub(Expr::cell(expiry), Expr::cell(today)));
            days
        } else {
            let days = self.origin.right(HEADER_FIELDS);
            let value: Cell = header.days_to_expiry.map(|d| d as f64).into();
            self.write(days, value);
            days
        };

        HeaderCells {
            last_price: self.origin.right(2),
            days,
        }
    }

    fn insert(&mut self, geometry: &TableGeometry, row: u32, rows: u32) {
        self.push(GridEdit::InsertCells {
            row,
            rows,
            column: geometry.left,
            count: INSERTED_CELLS,
            side: InsertSide::Left,
        });
        self.push(GridEdit::InsertCells {
            row,
            rows,
            column: geometry.right,
            count: INSERTED_CELLS,
            side: InsertSide::Right,
        });
    }

    /// Labels for the four new cells, formatted like the first data column
    fn table_header(&mut self, geometry: &TableGeometry, row: u32) {
        let labels = LEFT_LABELS
            .iter()
            .enumerate()
            .map(|(k, l)| (CellRef::new(row, geometry.left + k as u32), *l))
            .chain(
                RIGHT_LABELS
                    .iter()
                    .enumerate()
                    .map(|(k, l)| (CellRef::new(row, geometry.right + k as u32), *l)),
            );

        let source = CellRef::new(row, geometry.data);
        for (at, label) in labels.collect::<Vec<_>>() {
            self.write(at, Cell::text(label));
            self.push(GridEdit::CopyFormat { from: source, to: at });
        }
    }

    /// Metrics for one strike row.
    ///
    /// Call-side cells copy their formatting from the call-bid column and
    /// put-side cells from the put-bid column, each side matching the quote
    /// it is computed from rather than a fixed trailing column.
    fn strike_row(
        &mut self,
        geometry: &TableGeometry,
        row: u32,
        cells: &[Cell],
        classified: &ClassifiedGrid,
        header: HeaderCells,
    ) {
        let strike = geometry.data_cell(row, STRIKE_COLUMN);
        let call_bid = geometry.data_cell(row, CALL_BID_COLUMN);
        let put_bid = geometry.data_cell(row, PUT_BID_COLUMN);

        let (call_arr, call_be, put_be, put_arr): (CellContent, CellContent, CellContent, CellContent) =
            if self.config.emit_formulas {
                let days = || Expr::cell(header.days);
                (
                    Expr::annualized_return(
                        Expr::min([Expr::cell(header.last_price), Expr::cell(strike)]),
                        Expr::cell(call_bid),
                        days(),
                    )
                    .into(),
                    Expr::break_even(Expr::cell(strike), Expr::cell(call_bid)).into(),
                    Expr::break_even(Expr::cell(strike), Expr::cell(put_bid)).into(),
                    Expr::annualized_return(Expr::cell(strike), Expr::cell(put_bid), days()).into(),
                )
            } else {
                let m = StrikeMetrics::compute(
                    &StrikeRow::from_row(cells),
                    classified.header.last_price,
                    classified.header.days_to_expiry,
                );
                (
                    Cell::from(m.call_arr).into(),
                    Cell::from(m.call_break_even).into(),
                    Cell::from(m.put_break_even).into(),
                    Cell::from(m.put_arr).into(),
                )
            };

        tracing::debug!("Strike row {} at {}", row, strike);

        let arr_format = self.config.arr_number_format.clone();
        let be_format = self.config.be_number_format.clone();
        self.metric_cell(CellRef::new(row, geometry.left), call_arr, call_bid, &arr_format);
        self.metric_cell(CellRef::new(row, geometry.left + 1), call_be, call_bid, &be_format);
        self.metric_cell(CellRef::new(row, geometry.right), put_be, put_bid, &be_format);
        self.metric_cell(CellRef::new(row, geometry.right + 1), put_arr, put_bid, &arr_format);
    }

    /// Content, then formatting copied from `format_from`, then the number format
    fn metric_cell(&mut self, at: CellRef, content: CellContent, format_from: CellRef, pattern: &str) {
        self.write(at, content);
        self.push(GridEdit::CopyFormat { from: format_from, to: at });
        self.push(GridEdit::NumberFormat {
            at,
            pattern: pattern.to_string(),
        });
    }
}
