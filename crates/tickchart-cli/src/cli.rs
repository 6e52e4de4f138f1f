//! CLI argument definitions for tickchart.
//!
//! Every flag is optional. Anything not given on the command line is asked
//! for interactively, in the same order as the flags below.
//!
//! # Examples
//!
//! ```bash
//! # Fully interactive
//! tickchart
//!
//! # Daily line chart for the first half of 2023, no prompts
//! tickchart --symbol ibm --chart-type 1 --granularity 2 \
//!     --start 2023-01-01 --end 2023-06-30
//!
//! # Write into a known directory and skip the browser
//! tickchart --symbol msft --output-dir ./out --no-open
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Stock Data Chart Generator
///
/// Fetches price history from Alpha Vantage and opens it as a chart in the
/// default browser.
#[derive(Debug, Parser)]
#[command(name = "tickchart", author, version, about = "Stock Data Chart Generator")]
pub struct Cli {
    /// Stock symbol, up to 5 letters (e.g. AAPL, MSFT).
    #[arg(long)]
    pub symbol: Option<String>,

    /// Chart type: 1 or line, 2 or bar.
    #[arg(long)]
    pub chart_type: Option<String>,

    /// Time series: 1 intraday, 2 daily, 3 weekly, 4 monthly.
    #[arg(long)]
    pub granularity: Option<String>,

    /// Start date (YYYY-MM-DD, DD-MM-YYYY, MM/DD/YYYY and similar).
    #[arg(long)]
    pub start: Option<String>,

    /// End date, same formats as --start.
    #[arg(long)]
    pub end: Option<String>,

    /// Write chart files here instead of a fresh temporary directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Do not open the chart in a browser.
    #[arg(long, default_value_t = false)]
    pub no_open: bool,

    /// Alpha Vantage API key; overrides TICKCHART_ALPHAVANTAGE_API_KEY.
    #[arg(long)]
    pub api_key: Option<String>,
}
