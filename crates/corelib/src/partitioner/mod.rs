//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are the ring's hash function: they turn keys and virtual
//! node labels into tokens that can be placed on the ring.

pub mod func;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use func::FnPartitioner;
pub use sip::SipPartitioner;
pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;
