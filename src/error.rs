use std::path::PathBuf;

/// Errors raised when a board snapshot from outside the crate is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid cell value {value:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, value: String },

    #[error("piece at row {row}, column {col} has an empty cell below it")]
    FloatingPiece { row: usize, col: usize },
}

/// Errors that can occur during a tree search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
