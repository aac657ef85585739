//! Core data types for the chain screener
//!
//! Defines fundamental types:
//! - Cell / Grid / CellRef: pasted cells and sheet coordinates
//! - StrikeRow: strike and bids read from a chain row
//! - InstrumentHeader: ticker, last price and expiry of the pasted chain

pub mod cell;
pub mod option;
pub mod header;
pub mod error;

pub use cell::*;
pub use option::*;
pub use header::*;
pub use error::*;
