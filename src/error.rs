//! Error types for the duelgrid crate

use thiserror::Error;

/// Main error type for the duelgrid crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no legal actions for seat {seat} on board\n{board}")]
    NoLegalActions { seat: u8, board: String },

    #[error("strategy '{strategy}' produced unplayable action {action} on board\n{board}")]
    MoveRejected {
        strategy: String,
        action: String,
        board: String,
    },

    #[error("board text too short: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at cell {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid board code '{input}': {reason}")]
    ParseBoardCode { input: String, reason: String },

    #[error("invalid action '{input}' (expected 'row,col:seat' or 'col:seat')")]
    ParseAction { input: String },

    #[error("invalid seat '{input}' (expected '1' or '2')")]
    ParseSeat { input: String },

    #[error("invalid game '{input}'. Expected one of: ttt, connect4")]
    ParseGameKind { input: String },

    #[error("invalid strategy spec '{input}'. Expected one of: {expected}")]
    ParseStrategySpec { input: String, expected: String },

    #[error("policy file '{path}' must have a .json extension")]
    PolicyFileExtension { path: String },

    #[error("malformed policy file '{path}': {message}")]
    PolicyFileFormat { path: String, message: String },

    #[error("manual input error: {message}")]
    ManualInput { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
