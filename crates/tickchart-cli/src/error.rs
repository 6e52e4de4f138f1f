use thiserror::Error;

use tickchart_core::{ConfigError, CoreError, SourceError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("no data found between {start} and {end}")]
    EmptyRange { start: String, end: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(error) => Self::Validation(error),
            CoreError::Source(error) => Self::Source(error),
            CoreError::EmptyRange { start, end } => Self::EmptyRange { start, end },
            CoreError::Config(error) => Self::Config(error),
            CoreError::Io(error) => Self::Io(error),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Source(_) => 3,
            Self::EmptyRange { .. } => 4,
            Self::Config(_) => 5,
            Self::Io(_) => 10,
        }
    }

    /// Input errors read as a plain message; everything after the request
    /// was sent is reported as `ERROR: ...`.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(error) => error.to_string(),
            other => format!("ERROR: {other}"),
        }
    }
}
