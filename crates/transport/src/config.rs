//! Peer pool configuration.

use corelib::partitioner::Xxh3Partitioner;
use corelib::{Partitioner, DEFAULT_REPLICAS};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Path prefix peers serve and request values under.
pub const DEFAULT_BASE_PATH: &str = "/_ccache/";

/// Configuration for an [`HttpPool`](crate::HttpPool).
#[derive(Clone)]
pub struct PoolConfig {
    /// Path prefix, starting and ending with `/`
    pub base_path: String,

    /// Virtual nodes per peer on the ring
    pub replicas: usize,

    /// Timeout applied by the HTTP client to every peer fetch
    pub request_timeout: Duration,

    /// Ring hash function. Must be identical on every node.
    pub partitioner: Arc<dyn Partitioner>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            request_timeout: Duration::from_secs(5),
            partitioner: Arc::new(Xxh3Partitioner),
        }
    }
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("base_path", &self.base_path)
            .field("replicas", &self.replicas)
            .field("request_timeout", &self.request_timeout)
            .field("partitioner", &self.partitioner.name())
            .finish()
    }
}
