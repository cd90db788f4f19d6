//! Common error types for KEDB

use thiserror::Error;

/// Common result type for KEDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the KEDB crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Target file already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Every four-digit KEDB number is already in use
    #[error("KEDB identifier space exhausted (last number is KEDB{0:04})")]
    IdentifierSpaceExhausted(u32),

    /// Document assembly or packaging failed
    #[error("Document error: {0}")]
    Document(String),
}
