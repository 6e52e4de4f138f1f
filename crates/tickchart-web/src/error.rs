use thiserror::Error;

use tickchart_core::{ConfigError, CoreError, ValidationError};

/// Failure while turning a form submission into a chart. Always rendered
/// back into the page, never as an HTTP error status.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("No stock symbol provided.")]
    MissingSymbol,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to save chart: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure before the server starts accepting requests.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
