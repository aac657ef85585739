//! Screening formulas
//!
//! Implements:
//! - Annualized return and break-even (numeric path)
//! - Formula expressions for live host formulas (formula path)

pub mod returns;
pub mod formula;

pub use returns::*;
pub use formula::*;
