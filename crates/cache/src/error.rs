//! Error types for cache groups.

use thiserror::Error;

/// Result type alias for the cache crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading through a group.
///
/// Errors are `Clone` because a single failed load is handed to every
/// caller that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Empty key passed to `Group::get`
    #[error("key is required")]
    InvalidKey,

    /// The source of truth has no value for the key
    #[error("{key} not exist")]
    NotFound { key: String },

    /// The source of truth failed for another reason
    #[error("loader error: {0}")]
    Loader(String),

    /// The owning peer could not be reached or answered with a failure status
    #[error("peer unavailable: {0}")]
    PeerUnavailable(String),

    /// A peer response could not be decoded
    #[error("decoding response body: {0}")]
    Decode(String),

    /// Request named a group that is not registered
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// A group with this name already exists in the registry
    #[error("group already registered: {0}")]
    DuplicateGroup(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound { key: key.into() }
    }

    /// Shorthand for [`Error::Loader`].
    pub fn loader(msg: impl Into<String>) -> Self {
        Error::Loader(msg.into())
    }

    /// True for a missing key at the source of truth.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True for failures talking to a peer. These are recovered by loading locally.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::PeerUnavailable(_) | Error::Decode(_))
    }
}
