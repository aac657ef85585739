//! Live formula expressions
//!
//! Layout plans can write formulas instead of numbers so the host sheet keeps
//! recalculating when quotes are edited. `Expr` renders the host formula
//! text and can also be evaluated locally through the same numeric functions
//! used for direct values, so both paths give identical results.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Cell, CellRef};

use super::returns::{ANNUALIZED_RETURN, BREAK_EVEN};

/// Host function names
pub const ANNUALIZED_RETURN_FN: &str = "ANNUALIZED_RETURN";
pub const BREAK_EVEN_FN: &str = "BREAK_EVEN";

/// Formula expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Reference to another cell
    Ref(CellRef),
    /// `MIN(...)`, skipping non-numeric operands
    Min(Vec<Expr>),
    /// `TODAY()`
    Today,
    /// `a-b`; two dates give a day count
    Sub(Box<Expr>, Box<Expr>),
    /// `ANNUALIZED_RETURN(investment, gain, days)`
    AnnualizedReturn(Box<Expr>, Box<Expr>, Box<Expr>),
    /// `BREAK_EVEN(strike, bid)`
    BreakEven(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn cell(at: CellRef) -> Self {
        Expr::Ref(at)
    }

    pub fn min(operands: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Min(operands.into_iter().collect())
    }

    pub fn sub(a: Expr, b: Expr) -> Self {
        Expr::Sub(Box::new(a), Box::new(b))
    }

    pub fn annualized_return(investment: Expr, gain: Expr, days: Expr) -> Self {
        Expr::AnnualizedReturn(Box::new(investment), Box::new(gain), Box::new(days))
    }

    pub fn break_even(strike: Expr, bid: Expr) -> Self {
        Expr::BreakEven(Box::new(strike), Box::new(bid))
    }

    /// Formula text as written into the host, with the leading `=`
    pub fn formula_text(&self) -> String {
        format!("={}", self)
    }

    /// Evaluate against a cell lookup.
    ///
    /// `lookup` resolves references to already-evaluated cell values.
    pub fn eval(&self, lookup: &dyn Fn(CellRef) -> Cell, today: NaiveDate) -> Cell {
        match self {
            Expr::Ref(at) => lookup(*at),
            Expr::Today => Cell::Date(today),
            Expr::Min(operands) => {
                let smallest = operands
                    .iter()
                    .filter_map(|e| e.eval(lookup, today).as_number())
                    .reduce(f64::min);
                // The host's MIN of nothing numeric is zero
                Cell::Number(smallest.unwrap_or(0.0))
            }
            Expr::Sub(a, b) => match (a.eval(lookup, today), b.eval(lookup, today)) {
                (Cell::Date(x), Cell::Date(y)) => Cell::Number((x - y).num_days() as f64),
                (x, y) => match (x.as_number(), y.as_number()) {
                    (Some(x), Some(y)) => Cell::Number(x - y),
                    _ => Cell::Empty,
                },
            },
            Expr::AnnualizedReturn(i, g, d) => ANNUALIZED_RETURN(
                &i.eval(lookup, today),
                &g.eval(lookup, today),
                &d.eval(lookup, today),
            ),
            Expr::BreakEven(s, b) => BREAK_EVEN(&s.eval(lookup, today), &b.eval(lookup, today)),
        }
    }

    /// Visit every cell reference mutably, e.g. to follow cells the host moved
    pub fn refs_mut(&mut self, f: &mut dyn FnMut(&mut CellRef)) {
        match self {
            Expr::Ref(at) => f(at),
            Expr::Today => {}
            Expr::Min(operands) => {
                for e in operands {
                    e.refs_mut(f);
                }
            }
            Expr::Sub(a, b) | Expr::BreakEven(a, b) => {
                a.refs_mut(f);
                b.refs_mut(f);
            }
            Expr::AnnualizedReturn(i, g, d) => {
                i.refs_mut(f);
                g.refs_mut(f);
                d.refs_mut(f);
            }
        }
    }

    fn is_atomic(&self) -> bool {
        !matches!(self, Expr::Sub(..))
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, name: &str, args: &[&Expr]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str(")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ref(at) => write!(f, "{}", at),
            Expr::Today => f.write_str("TODAY()"),
            Expr::Min(operands) => {
                let args: Vec<&Expr> = operands.iter().collect();
                write_args(f, "MIN", &args)
            }
            Expr::Sub(a, b) => {
                write!(f, "{}-", a)?;
                if b.is_atomic() {
                    write!(f, "{}", b)
                } else {
                    write!(f, "({})", b)
                }
            }
            Expr::AnnualizedReturn(i, g, d) => {
                write_args(f, ANNUALIZED_RETURN_FN, &[i.as_ref(), g.as_ref(), d.as_ref()])
            }
            Expr::BreakEven(s, b) => write_args(f, BREAK_EVEN_FN, &[s.as_ref(), b.as_ref()]),
        }
    }
}
