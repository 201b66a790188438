//! Error types for the oxrl crate

use thiserror::Error;

/// Main error type for the oxrl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid action: cell {action} is not legal in this position")]
    InvalidAction { action: usize },

    #[error("agent '{agent}' returned illegal action {action}")]
    IllegalAction { agent: String, action: usize },

    #[error("invalid board state: {message}")]
    InvalidState { message: String },

    #[error("policy evaluation did not converge within {sweeps} sweeps (last delta {delta})")]
    NonConvergence { sweeps: usize, delta: f64 },

    #[error("no legal actions available")]
    NoLegalActions,

    #[error("board label has wrong length: expected {expected} cells, got {got} in '{label}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        label: String,
    },

    #[error("invalid character '{character}' at cell {position} in '{label}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        label: String,
    },

    #[error("malformed table entry on line {line}: {message}")]
    ParseTable { line: usize, message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
