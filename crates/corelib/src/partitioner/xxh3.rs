//! XXH3 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::Token;
use xxhash_rust::xxh3::xxh3_64;

/// XXH3-64 partitioner. This is the default hash function of the ring.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    fn partition(&self, key: &[u8]) -> Token {
        Token(xxh3_64(key))
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
