//! Core library for consistent hashing.
//!
//! This crate provides the ring that assigns every key to exactly one peer:
//! - Token type (ring positions)
//! - Partitioner algorithms (the ring's hash function)
//! - Virtual node abstraction
//! - The hash ring and its builder

pub mod error;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod vnode;

pub use error::{Error, Result};
pub use partitioner::Partitioner;
pub use ring::{HashRing, RingBuilder, DEFAULT_REPLICAS};
pub use token::Token;
pub use vnode::VirtualNode;
