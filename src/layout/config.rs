//! Configuration for the table layout planner

use serde::{Deserialize, Serialize};

/// How the new ARR / break-even cells are inserted into the strike table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertionGranularity {
    /// One left and one right insertion per table row, anchored to that row
    #[default]
    PerRow,
    /// One left and one right insertion spanning the whole table
    PerTable,
}

/// Configuration for layout planning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Write live formulas (`true`) or computed numbers (`false`)
    /// Default: true
    pub emit_formulas: bool,

    /// Per-row or per-table cell insertion
    /// Default: per-row
    pub insertion: InsertionGranularity,

    /// Number format for annualized-return cells
    /// Default: "0.00%"
    pub arr_number_format: String,

    /// Number format for break-even cells
    /// Default: "0.00"
    pub be_number_format: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            emit_formulas: true,
            insertion: InsertionGranularity::PerRow,
            arr_number_format: "0.00%".to_string(),
            be_number_format: "0.00".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Computed numbers instead of formulas
    pub fn values() -> Self {
        Self {
            emit_formulas: false,
            ..Default::default()
        }
    }

    /// One insertion for the whole table
    pub fn per_table() -> Self {
        Self {
            insertion: InsertionGranularity::PerTable,
            ..Default::default()
        }
    }
}
