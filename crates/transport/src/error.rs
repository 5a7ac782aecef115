//! Error types for the transport crate.

use thiserror::Error;

/// Result type alias for the transport crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up or running the peer server.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (bind, accept)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Invalid listen or peer address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
