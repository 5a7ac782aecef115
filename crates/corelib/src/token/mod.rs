//! Token abstraction module for consistent hashing.
//!
//! Tokens represent positions on the hash ring. Every partitioner in this
//! crate produces a 64-bit token so rings built with different hash
//! functions share one ordering and lookup implementation.

use std::fmt;

/// A position on the hash ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Token(pub u64);

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Token(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
