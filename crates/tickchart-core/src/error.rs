use thiserror::Error;

use crate::config::ConfigError;
use crate::data_source::SourceError;

/// User-correctable input errors. Raised before any I/O happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains non-alphabetic character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid chart type '{value}', expected 1 (line) or 2 (bar)")]
    InvalidChartType { value: String },
    #[error(
        "invalid time series '{value}', expected 1 (intraday), 2 (daily), 3 (weekly) or 4 (monthly)"
    )]
    InvalidGranularity { value: String },

    #[error(
        "invalid date '{value}'; use YYYY-MM-DD or a common variant (DD-MM-YYYY, MM/DD/YYYY, ...)"
    )]
    InvalidDate { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("no data found between {start} and {end}")]
    EmptyRange { start: String, end: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
