//! Interactive prompt flow. Each answer is validated as soon as it is read;
//! the first invalid answer ends the flow.

use std::io::{BufRead, Write};

use tickchart_core::{
    parse_date_pair, validate_chart_type, validate_granularity, validate_symbol, ChartRequest,
    ChartType, Granularity,
};

use crate::cli::Cli;
use crate::error::CliError;

pub const BANNER: &str = "********** Stock Data Chart Generator **********";

/// Reads answers from `input` and writes prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Build a request from flags, prompting for whatever is missing.
    pub fn collect(&mut self, cli: &Cli) -> Result<ChartRequest, CliError> {
        writeln!(self.output, "{BANNER}")?;

        let symbol = match &cli.symbol {
            Some(symbol) => symbol.clone(),
            None => self.ask("Enter Stock Symbol (e.g., AAPL, MSFT): ")?,
        };
        let symbol = validate_symbol(&symbol.trim().to_ascii_uppercase())?;

        let chart_type = match &cli.chart_type {
            Some(chart_type) => chart_type.clone(),
            None => {
                writeln!(self.output, "\nSelect Chart Type:")?;
                for chart_type in ChartType::ALL {
                    writeln!(self.output, "{}. {}", chart_type.code(), chart_type.label())?;
                }
                self.ask("Enter your choice (1 or 2): ")?
            }
        };
        let chart_type = validate_chart_type(chart_type.trim())?;

        let granularity = match &cli.granularity {
            Some(granularity) => granularity.clone(),
            None => {
                writeln!(self.output, "\nSelect Time Series:")?;
                for granularity in Granularity::ALL {
                    writeln!(self.output, "{}. {}", granularity.code(), granularity.label())?;
                }
                self.ask("Enter your choice (1, 2, 3, 4): ")?
            }
        };
        let granularity = validate_granularity(granularity.trim())?;

        let start = match &cli.start {
            Some(start) => start.clone(),
            None => self.ask("Enter start date: ")?,
        };
        let end = match &cli.end {
            Some(end) => end.clone(),
            None => self.ask("Enter end date: ")?,
        };
        let range = parse_date_pair(start.trim(), end.trim())?;
        if range.swapped() {
            writeln!(
                self.output,
                "Warning: Start date ({}) is after end date ({}). Swapping them.",
                range.end_iso(),
                range.start_iso()
            )?;
        }

        Ok(ChartRequest::new(symbol, chart_type, granularity, Some(range)))
    }

    /// Print `prompt` and read one line; end of input reads as empty.
    fn ask(&mut self, prompt: &str) -> Result<String, CliError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
