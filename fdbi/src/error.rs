//! Error types for fdbi

use thiserror::Error;

/// Result type alias for fdbi operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during database operations
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite driver error, passed through as raised by the driver
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// `next` was called on a row stream with no row left
    #[error("Iteration exhausted: no more rows")]
    Exhausted,

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Commit or rollback requested outside a manual transaction
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Invalid connection configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading configuration or scripts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while reading configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error was raised by the database driver.
    pub fn is_driver_error(&self) -> bool {
        matches!(self, Error::Sqlite(_))
    }
}
