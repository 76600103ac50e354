//! Common error types for placerec

use thiserror::Error;

/// Common result type for placerec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the store backends and the server
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

    /// Invalid user input (missing or empty required field)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (e.g. stored data that cannot be decoded)
    #[error("Internal error: {0}")]
    Internal(String),
}
