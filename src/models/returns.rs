//! Premium yield formulas
//!
//! Provides:
//! - Annualized return of collecting a premium against capital at risk
//! - Break-even price of a short option
//! - Cell-level versions with the host's empty-result rules
//!
//! Every function is total. Missing or out-of-domain operands give an
//! empty result instead of an error.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, OptionType, StrikeRow};

/// Days in the compounding year
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Annualized return: `(1 + gain/investment)^(365/days) - 1`.
///
/// Empty when any operand is not finite, `investment` is zero, `days` is not
/// strictly positive, or the result itself is not finite.
pub fn annualized_return(investment: f64, gain: f64, days: f64) -> Option<f64> {
    if !investment.is_finite() || !gain.is_finite() || !days.is_finite() {
        return None;
    }
    if investment == 0.0 || days <= 0.0 {
        return None;
    }

    let total_return = gain / investment;
    let annualized = (1.0 + total_return).powf(DAYS_PER_YEAR / days) - 1.0;
    annualized.is_finite().then_some(annualized)
}

/// Break-even of a short option: `strike - bid`
pub fn break_even(strike: f64, bid: f64) -> Option<f64> {
    if !strike.is_finite() || !bid.is_finite() {
        return None;
    }
    Some(strike - bid)
}

/// `ANNUALIZED_RETURN(investment, gain, days)` over cells.
///
/// Only number cells are operands; text such as `"100"` is not numeric.
#[allow(non_snake_case)]
pub fn ANNUALIZED_RETURN(investment: &Cell, gain: &Cell, days: &Cell) -> Cell {
    match (investment.as_number(), gain.as_number(), days.as_number()) {
        (Some(i), Some(g), Some(d)) => annualized_return(i, g, d).into(),
        _ => Cell::Empty,
    }
}

/// `BREAK_EVEN(strike, bid)` over cells
#[allow(non_snake_case)]
pub fn BREAK_EVEN(strike: &Cell, bid: &Cell) -> Cell {
    match (strike.as_number(), bid.as_number()) {
        (Some(s), Some(b)) => break_even(s, b).into(),
        _ => Cell::Empty,
    }
}

/// Computed columns for one strike row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeMetrics {
    /// Annualized return of selling the call against `min(last, strike)`
    pub call_arr: Option<f64>,
    /// Break-even of the short call
    pub call_break_even: Option<f64>,
    /// Break-even of the short put
    pub put_break_even: Option<f64>,
    /// Annualized return of selling the put against the strike
    pub put_arr: Option<f64>,
}

impl StrikeMetrics {
    pub fn compute(row: &StrikeRow, last_price: Option<f64>, days: Option<i64>) -> Self {
        let days = days.map(|d| d as f64);
        let arr = |investment: Option<f64>, side: OptionType| {
            annualized_return(investment?, row.bid(side)?, days?)
        };
        let be = |side: OptionType| break_even(row.strike?, row.bid(side)?);

        Self {
            call_arr: arr(row.call_investment(last_price), OptionType::Call),
            call_break_even: be(OptionType::Call),
            put_break_even: be(OptionType::Put),
            put_arr: arr(row.put_investment(), OptionType::Put),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annualized_return() {
        let cases = [
            (1000.0, 100.0, 365.0, 0.1),
            (1000.0, 200.0, 365.0, 0.2),
            (1000.0, 100.0, 30.0, 1.1_f64.powf(365.0 / 30.0) - 1.0),
            (500.0, 50.0, 180.0, 1.1_f64.powf(365.0 / 180.0) - 1.0),
            (1000.0, -100.0, 365.0, -0.1),
        ];
        for (investment, gain, days, expected) in cases {
            let result = annualized_return(investment, gain, days).unwrap();
            assert!((result - expected).abs() < 1e-6, "{} vs {}", result, expected);
        }
    }

    #[test]
    fn test_zero_gain_is_exactly_zero() {
        assert_eq!(annualized_return(1000.0, 0.0, 365.0), Some(0.0));
        assert_eq!(annualized_return(1000.0, 0.0, 7.0), Some(0.0));
    }

    #[test]
    fn test_annualized_return_domain() {
        assert_eq!(annualized_return(1000.0, 100.0, 0.0), None);
        assert_eq!(annualized_return(0.0, 100.0, 365.0), None);
        assert_eq!(annualized_return(1000.0, 100.0, -10.0), None);
        assert_eq!(annualized_return(f64::NAN, 100.0, 365.0), None);
        assert_eq!(annualized_return(1000.0, f64::NAN, 365.0), None);
        assert_eq!(annualized_return(1000.0, 100.0, f64::NAN), None);
        assert_eq!(annualized_return(1000.0, 100.0, f64::INFINITY), None);
        // Negative base under a fractional power
        assert_eq!(annualized_return(100.0, -300.0, 30.0), None);
    }

    #[test]
    fn test_break_even() {
        assert_eq!(break_even(100.0, 5.0), Some(95.0));
        assert_eq!(break_even(100.0, f64::NAN), None);
        assert_eq!(break_even(f64::INFINITY, 5.0), None);
    }

    #[test]
    fn test_cell_functions() {
        let n = Cell::Number;
        assert_eq!(ANNUALIZED_RETURN(&n(1000.0), &n(0.0), &n(365.0)), n(0.0));
        assert_eq!(ANNUALIZED_RETURN(&Cell::text("1000"), &n(100.0), &n(365.0)), Cell::Empty);
        assert_eq!(ANNUALIZED_RETURN(&n(1000.0), &Cell::text("100"), &n(365.0)), Cell::Empty);
        assert_eq!(ANNUALIZED_RETURN(&n(1000.0), &n(100.0), &Cell::Empty), Cell::Empty);
        assert_eq!(ANNUALIZED_RETURN(&n(1000.0), &n(100.0), &n(0.0)), Cell::Empty);

        assert_eq!(BREAK_EVEN(&n(100.0), &n(5.0)), n(95.0));
        assert_eq!(BREAK_EVEN(&n(100.0), &Cell::text("5")), Cell::Empty);
        assert_eq!(BREAK_EVEN(&Cell::Empty, &n(5.0)), Cell::Empty);
    }

    #[test]
    fn test_strike_metrics() {
        let row = StrikeRow {
            strike: Some(15.0),
            call_bid: Some(0.5),
            put_bid: Some(1.2),
        };
        let m = StrikeMetrics::compute(&row, Some(12.0), Some(30));

        assert_eq!(m.call_arr, annualized_return(12.0, 0.5, 30.0));
        assert_eq!(m.call_break_even, Some(14.5));
        assert_eq!(m.put_break_even, break_even(15.0, 1.2));
        assert_eq!(m.put_arr, annualized_return(15.0, 1.2, 30.0));
    }

    #[test]
    fn test_strike_metrics_degrade() {
        let row = StrikeRow {
            strike: Some(15.0),
            call_bid: None,
            put_bid: Some(1.2),
        };
        let m = StrikeMetrics::compute(&row, Some(12.0), None);

        assert_eq!(m.call_arr, None);
        assert_eq!(m.call_break_even, None);
        assert_eq!(m.put_break_even, break_even(15.0, 1.2));
        assert_eq!(m.put_arr, None);
    }
}
