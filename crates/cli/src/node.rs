//! Node startup: group, peer pool, servers.

use crate::api;
use crate::config::CliConfig;
use crate::demo;
use anyhow::{Context, Result};
use cache::{PeerPicker, Registry};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use transport::{HttpPool, PoolConfig};

/// Run a node until its peer server stops.
pub async fn run(config: CliConfig) -> Result<()> {
    let self_url = config.self_url();
    if !config.peers.contains(&self_url) {
        warn!(node = %self_url, "this node is not in the peer list; it will never own a key");
    }

    let registry = Arc::new(Registry::new());
    let group = registry.new_group(demo::GROUP, config.cache_bytes, demo::slow_db())?;

    let pool_config = PoolConfig {
        replicas: config.replicas,
        ..PoolConfig::default()
    };
    let pool = Arc::new(HttpPool::new(self_url.clone(), Arc::clone(&registry), pool_config)?);
    pool.set_peers(config.peers.iter().cloned());
    group.register_peers(Arc::clone(&pool) as Arc<dyn PeerPicker>);

    if config.api {
        let addr = config.api_bind_addr().to_string();
        let group = Arc::clone(&group);
        tokio::spawn(async move {
            if let Err(e) = api::serve(&addr, group).await {
                error!(%addr, "API server stopped: {:#}", e);
            }
        });
    }

    let listener = TcpListener::bind((config.bind.as_str(), config.port))
        .await
        .with_context(|| format!("binding peer server on {}:{}", config.bind, config.port))?;
    info!(node = %self_url, "ccache is running");

    pool.serve(listener).await?;
    Ok(())
}
