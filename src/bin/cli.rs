//! Chain Screener CLI
//!
//! Classifies a pasted option-chain table and prints the layout plan, a
//! preview of the rewritten sheet, or the extracted instrument header.
//!
//! Usage:
//!   chain-screener paste.tsv --origin-row 3 --origin-col 2 --output preview

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use chain_screener::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Ordered sheet edits as JSON
    Plan,
    /// The sheet after applying the plan, tab-separated
    Preview,
    /// Extracted instrument header as JSON
    Header,
}

#[derive(Parser, Debug)]
#[command(name = "chain-screener")]
#[command(about = "Screen covered calls and cash-secured puts in a pasted option chain")]
struct Args {
    /// Pasted grid: `.json` (array of rows) or tab-separated text
    input: PathBuf,

    /// Sheet row of the paste's top-left cell (1-based)
    #[arg(long, default_value = "1")]
    origin_row: u32,

    /// Sheet column of the paste's top-left cell (1-based)
    #[arg(long, default_value = "1")]
    origin_col: u32,

    /// Write computed numbers instead of live formulas
    #[arg(long)]
    values: bool,

    /// Insert the new columns once for the whole table
    #[arg(long)]
    per_table: bool,

    /// Evaluate as of this date (YYYY-MM-DD) instead of the local date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Layout configuration JSON; flags above override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "plan")]
    output: Output,
}

fn load_config(args: &Args) -> Result<LayoutConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    if args.values {
        config.emit_formulas = false;
    }
    if args.per_table {
        config.insertion = InsertionGranularity::PerTable;
    }
    Ok(config)
}

fn print_preview(grid: &Grid) {
    for row in grid {
        let end = row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        let line: Vec<String> = row[..end].iter().map(Cell::display_text).collect();
        println!("{}", line.join("\t"));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let today = args.today.unwrap_or_else(chain_screener::data::today);
    let origin = CellRef::new(args.origin_row, args.origin_col);

    let grid = load_grid(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let classified = classify_rows(&grid, origin.row as usize, today);

    match args.output {
        Output::Header => {
            println!("{}", serde_json::to_string_pretty(&classified.header)?);
        }
        Output::Plan => {
            let plan = plan_layout(&classified, &grid, origin, &config)?;
            println!("{}", plan.to_json()?);
        }
        Output::Preview => {
            let plan = plan_layout(&classified, &grid, origin, &config)?;
            let mut sheet = MemorySurface::from_grid(&grid, origin)?;
            apply_plan(&mut sheet, &plan)?;
            print_preview(&sheet.read_grid(today));
        }
    }

    Ok(())
}
