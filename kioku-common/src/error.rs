//! Common error types for Kioku

use thiserror::Error;

/// Common result type for Kioku operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Kioku crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Referenced user or record absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input: bad date string, unknown type alias, out-of-range
    /// column index, and the like
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A concurrent write violated the record uniqueness constraint
    #[error("Storage conflict: {0}")]
    Conflict(String),

    /// Cooperative cancellation observed mid-batch
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
