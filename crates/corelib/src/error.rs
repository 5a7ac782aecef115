//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a hash ring.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid ring configuration (e.g. zero replicas)
    #[error("Invalid ring configuration: {0}")]
    InvalidConfig(String),

    /// Invalid peer address
    #[error("Invalid peer: {0}")]
    InvalidPeer(String),
}
