//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// token generation without synchronization overhead. For a given input
/// a partitioner must always return the same token; ring determinism
/// depends on it.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a token.
    fn partition(&self, key: &[u8]) -> Token;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
