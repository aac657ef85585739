//! # Chain Screener - premium screening for pasted option chains
//!
//! Reads an option-chain quote table pasted from a broker into a spreadsheet
//! and plans the edits that turn it into a compact screening table.
//!
//! ## Overview
//!
//! A paste holds an instrument line, a last-price line, a `CALLS` line with
//! the expiry, an `Open Interest` column header and one row per strike. The
//! screener:
//! - Extracts ticker, last price and expiry into a single header row
//! - Adds annualized return and break-even of selling the call (left side)
//!   and the put (right side) of every strike
//! - Deletes the metadata and junk rows
//!
//! ## Key Components
//!
//! - **core**: cells, sheet coordinates, strike rows, errors
//! - **data**: field extraction, expiry parsing, row classification, loading
//! - **models**: `ANNUALIZED_RETURN` / `BREAK_EVEN` and formula expressions
//! - **layout**: the planner producing an ordered `LayoutPlan`
//! - **surface**: applying a plan to a sheet (in-memory reference sheet)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chain_screener::prelude::*;
//!
//! let grid = load_grid("paste.tsv").unwrap();
//! let origin = CellRef::new(1, 1);
//! let today = chain_screener::data::today();
//!
//! let classified = classify_rows(&grid, origin.row as usize, today);
//! let plan = plan_layout(&classified, &grid, origin, &LayoutConfig::default()).unwrap();
//!
//! let mut sheet = MemorySurface::from_grid(&grid, origin).unwrap();
//! apply_plan(&mut sheet, &plan).unwrap();
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Fetch quotes or talk to a broker
//! - Price options or compute Greeks
//! - Keep the sheet in sync after the one-shot rewrite

pub mod core;
pub mod data;
pub mod layout;
pub mod models;
pub mod surface;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        Cell, CellRef, Grid, InstrumentHeader, OptionType, Origin, Row, ScreenerError,
        ScreenerResult, StrikeRow,
    };

    // Reading pastes
    pub use crate::data::{
        classify_rows, extract_expiry_text, extract_last_price, extract_ticker, load_grid,
        parse_expiry_date, ClassifiedGrid, RowRole,
    };

    // Formulas
    pub use crate::models::{annualized_return, break_even, Expr, StrikeMetrics};

    // Layout
    pub use crate::layout::{
        plan_layout, CellContent, GridEdit, InsertionGranularity, LayoutConfig, LayoutPlan,
        LayoutPlanner,
    };

    // Surfaces
    pub use crate::surface::{apply_plan, GridSurface, MemorySurface};
}

// Re-export main types at crate root
pub use crate::core::{ScreenerError, ScreenerResult};
pub use crate::layout::{plan_layout, LayoutConfig, LayoutPlan};
pub use crate::data::classify_rows;
