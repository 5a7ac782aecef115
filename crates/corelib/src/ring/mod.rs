//! Consistent hash ring implementation.
//!
//! The ring manages token positions and provides efficient lookup
//! operations for finding the peer responsible for a key.

#[allow(clippy::module_inception)]
pub mod ring;

pub use ring::{HashRing, RingBuilder, DEFAULT_REPLICAS};
