//! Reading pasted quote tables
//!
//! Handles:
//! - Field extraction from broker-formatted rows
//! - Expiry parsing and day counting
//! - Row classification
//! - Loading grids from JSON or tab-separated text

pub mod extract;
pub mod expiry;
pub mod classify;
pub mod loader;

pub use extract::*;
pub use expiry::*;
pub use classify::*;
pub use loader::*;
