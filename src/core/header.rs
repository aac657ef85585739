//! Instrument header fields gathered from the metadata rows above the chain

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// Instrument-level fields, derived once per pasted table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentHeader {
    /// Raw instrument line, e.g. "BITFARMS LTD COM BITF: NSDQ"
    pub instrument: String,
    /// Ticker symbol taken from the instrument line
    pub ticker: String,
    /// Last traded price of the underlying
    pub last_price: Option<f64>,
    /// Expiry exactly as it appeared on the CALLS row
    pub expiry_text: String,
    /// Parsed expiry date
    pub expiry_date: Option<NaiveDate>,
    /// Calendar days from today to expiry
    pub days_to_expiry: Option<i64>,
}

impl InstrumentHeader {
    /// Header fields in output order: instrument, ticker, last price, expiry text, expiry date
    pub fn cells(&self) -> [Cell; 5] {
        [
            Cell::text(self.instrument.clone()),
            Cell::text(self.ticker.clone()),
            self.last_price.into(),
            Cell::text(self.expiry_text.clone()),
            self.expiry_date.into(),
        ]
    }
}
