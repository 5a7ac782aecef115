//! Command-line configuration for a cache node.

use anyhow::{bail, Result};
use clap::Parser;

/// Peer-to-peer read-through cache node
#[derive(Parser, Debug, Clone)]
#[command(name = "ccache-node", author, version, about, long_about = None)]
pub struct CliConfig {
    /// Port of the peer server
    #[arg(long, env = "CCACHE_PORT", default_value_t = 8001)]
    pub port: u16,

    /// Host name peers use to reach this node
    #[arg(long, env = "CCACHE_HOST", default_value = "localhost")]
    pub host: String,

    /// Interface the peer server binds to
    #[arg(long, env = "CCACHE_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    /// Base URLs of every node in the cluster, this one included
    #[arg(
        long,
        env = "CCACHE_PEERS",
        value_delimiter = ',',
        default_values = ["http://localhost:8001", "http://localhost:8002", "http://localhost:8003"]
    )]
    pub peers: Vec<String>,

    /// Also start the user-facing API server
    #[arg(long, env = "CCACHE_API")]
    pub api: bool,

    /// Address of the API server
    #[arg(long, env = "CCACHE_API_ADDR", default_value = "http://localhost:9999")]
    pub api_addr: String,

    /// Local cache capacity in bytes (0 = unbounded)
    #[arg(long, env = "CCACHE_CACHE_BYTES", default_value_t = 2 << 10)]
    pub cache_bytes: usize,

    /// Virtual nodes per peer on the hash ring
    #[arg(long, env = "CCACHE_REPLICAS", default_value_t = corelib::DEFAULT_REPLICAS)]
    pub replicas: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// URL other peers use for this node.
    pub fn self_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// `host:port` the API server binds to.
    pub fn api_bind_addr(&self) -> &str {
        self.api_addr
            .strip_prefix("http://")
            .unwrap_or(&self.api_addr)
    }

    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.peers.iter().any(|p| p.trim().is_empty()) {
            bail!("peer addresses must not be empty");
        }
        if self.replicas == 0 {
            bail!("--replicas must be at least 1");
        }
        Ok(())
    }

    /// Start the node and run until the peer server stops.
    pub async fn run(self) -> Result<()> {
        self.validate()?;
        crate::node::run(self).await
    }
}
