//! Function-backed partitioner.
//!
//! Wraps a plain function pointer so callers can supply their own hash,
//! most commonly a predictable one in tests.

use crate::partitioner::traits::Partitioner;
use crate::token::Token;
use std::fmt;

/// Partitioner backed by a `fn(&[u8]) -> u64`.
#[derive(Clone, Copy)]
pub struct FnPartitioner {
    hash: fn(&[u8]) -> u64,
}

impl FnPartitioner {
    /// Create a partitioner from a hash function.
    pub fn new(hash: fn(&[u8]) -> u64) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for FnPartitioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPartitioner").finish_non_exhaustive()
    }
}

impl Partitioner for FnPartitioner {
    fn partition(&self, key: &[u8]) -> Token {
        Token((self.hash)(key))
    }

    fn name(&self) -> &'static str {
        "FnPartitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(key: &[u8]) -> u64 {
        key.len() as u64
    }

    #[test]
    fn test_fn_partitioner_uses_function() {
        let p = FnPartitioner::new(length);
        assert_eq!(p.partition(b"abc"), Token(3));
        assert_eq!(p.name(), "FnPartitioner");
    }
}
