//! Field extractors
//!
//! Pull single scalars out of broker-formatted rows. Every extractor is
//! total: unrecognized input yields an empty result, never a panic.

use crate::core::Cell;

/// Ticker from an instrument line cell.
///
/// Non-text cells yield an empty string.
pub fn extract_ticker(instrument_line: &Cell) -> String {
    match instrument_line {
        Cell::Text(line) => ticker_from_line(line),
        _ => String::new(),
    }
}

/// Ticker from instrument text formatted as `"<name words> TICKER: <exchange>"`.
///
/// Takes the last whitespace-separated word before the first colon.
pub fn ticker_from_line(line: &str) -> String {
    let before_colon = line.split(':').next().unwrap_or("");
    before_colon
        .split_whitespace()
        .last()
        .unwrap_or("")
        .to_string()
}

/// First price found scanning the row left to right.
///
/// A text cell yields its first digit run (with an optional `.digits`
/// fraction); a numeric cell is returned as-is when finite.
pub fn extract_last_price(row: &[Cell]) -> Option<f64> {
    row.iter().find_map(|cell| match cell {
        Cell::Text(s) => first_decimal(s),
        Cell::Number(n) if n.is_finite() => Some(*n),
        _ => None,
    })
}

/// Expiry text from a CALLS row: first non-blank text cell after the label.
pub fn extract_expiry_text(row: &[Cell]) -> String {
    row.iter()
        .skip(1)
        .filter_map(Cell::as_text)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Whether a row holds at least one usable number
pub fn has_numeric(row: &[Cell]) -> bool {
    row.iter().any(|c| c.as_number().is_some())
}

/// Lower-cased row text, cells joined by single spaces
pub fn row_text(row: &[Cell]) -> String {
    row.iter()
        .map(Cell::display_text)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// First `digits[.digits]` run in a string
fn first_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    // Fraction only counts when at least one digit follows the dot
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    s[start..end].parse().ok().filter(|v: &f64| v.is_finite())
}
