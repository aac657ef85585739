//! Option-side types and the strike row of a pasted chain
//!
//! The pasted chain carries calls on the left and puts on the right of a
//! shared strike column. Columns are located by fixed offset; no header
//! matching is attempted.

use serde::{Deserialize, Serialize};

use super::cell::{cell_at, Cell};

/// Offset of the strike column within a strike-table row
pub const STRIKE_COLUMN: usize = 7;
/// Offset of the call bid column within a strike-table row
pub const CALL_BID_COLUMN: usize = 3;
/// Offset of the put bid column within a strike-table row
pub const PUT_BID_COLUMN: usize = 9;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Column offset of this side's bid in a strike row
    pub fn bid_column(&self) -> usize {
        match self {
            OptionType::Call => CALL_BID_COLUMN,
            OptionType::Put => PUT_BID_COLUMN,
        }
    }
}

/// One data row of the strike table.
///
/// Any field may be missing when the quote is absent or not numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeRow {
    pub strike: Option<f64>,
    pub call_bid: Option<f64>,
    pub put_bid: Option<f64>,
}

impl StrikeRow {
    /// Read a row as laid out before any columns were inserted
    pub fn from_row(row: &[Cell]) -> Self {
        Self {
            strike: cell_at(row, STRIKE_COLUMN).as_number(),
            call_bid: cell_at(row, CALL_BID_COLUMN).as_number(),
            put_bid: cell_at(row, PUT_BID_COLUMN).as_number(),
        }
    }

    /// Bid on the given side
    pub fn bid(&self, side: OptionType) -> Option<f64> {
        match side {
            OptionType::Call => self.call_bid,
            OptionType::Put => self.put_bid,
        }
    }

    /// Capital at risk for a covered call: the lesser of stock price and strike.
    ///
    /// Missing operands are skipped the same way the host's `MIN` skips blank
    /// cells; with neither present there is no investment.
    pub fn call_investment(&self, last_price: Option<f64>) -> Option<f64> {
        match (last_price, self.strike) {
            (Some(last), Some(strike)) => Some(last.min(strike)),
            (one, other) => one.or(other),
        }
    }

    /// Collateral for a cash-secured put
    pub fn put_investment(&self) -> Option<f64> {
        self.strike
    }
}
