//! HTTP transport between cache peers.
//!
//! - [`HttpPool`]: ring-based peer picker plus the server for local groups
//! - [`HttpGetter`]: client for one remote peer
//! - [`PoolConfig`]: base path, replica count, client timeout

pub mod client;
pub mod config;
pub mod error;
pub mod pool;
pub mod server;

pub use client::HttpGetter;
pub use config::{PoolConfig, DEFAULT_BASE_PATH};
pub use error::{Error, Result};
pub use pool::HttpPool;
