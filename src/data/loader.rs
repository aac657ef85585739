//! Grid loading for the command line
//!
//! Reads a pasted quote table either as JSON (an array of row arrays) or
//! as tab-separated text copied straight from a broker page.

use std::fs;
use std::path::Path;

use crate::core::{Cell, Grid, ScreenerError, ScreenerResult};

/// Load a grid from a file; `.json` files are parsed as JSON, anything else as TSV
pub fn load_grid(path: impl AsRef<Path>) -> ScreenerResult<Grid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let grid = if is_json { parse_json(&text)? } else { parse_tsv(&text) };
    tracing::info!("Loaded {} rows from {:?}", grid.len(), path);
    Ok(grid)
}

/// JSON grid: `[["AAPL"], ["Open Interest", "Bid"], [null, 1.5]]`
pub fn parse_json(text: &str) -> ScreenerResult<Grid> {
    serde_json::from_str(text).map_err(|e| ScreenerError::parse(format!("Invalid JSON grid: {}", e)))
}

/// Tab-separated text, one row per line
pub fn parse_tsv(text: &str) -> Grid {
    text.lines()
        .map(|line| line.trim_end_matches('\r').split('\t').map(parse_pasted_cell).collect())
        .collect()
}

/// Interpret one pasted cell the way a spreadsheet would on paste.
///
/// Plain numbers (with optional sign and thousands separators) become
/// numbers, blanks become empty, everything else stays text.
pub fn parse_pasted_cell(raw: &str) -> Cell {
    let s = raw.trim();
    if s.is_empty() {
        return Cell::Empty;
    }

    let looks_numeric = s.bytes().any(|b| b.is_ascii_digit())
        && s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b',' | b'-' | b'+'));

    if looks_numeric {
        if let Ok(n) = s.replace(',', "").parse::<f64>() {
            if n.is_finite() {
                return Cell::Number(n);
            }
        }
    }

    Cell::Text(s.to_string())
}
