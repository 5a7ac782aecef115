//! Named read-through cache namespace.
//!
//! # Read Path
//!
//! ```text
//! get(key)
//!   │
//!   ├─ empty key ───────────────▶ Error::InvalidKey
//!   ├─ local cache hit ─────────▶ value
//!   └─ miss ─▶ coalescer (one load per wave)
//!                │
//!                ├─ remote peer owns key ─▶ fetch ─ ok ─▶ value (not cached here)
//!                │                            └── error ─┐
//!                └─ no owner / self / fallback ◀─────────┘
//!                       │
//!                       loader ─ ok ─▶ insert into cache ─▶ value
//!                          └─── error ─▶ returned to every waiter
//! ```
//!
//! Values fetched from a peer are not mirrored into the local cache: the
//! owning peer holds the only cached copy of a key.

use crate::byteview::ByteView;
use crate::error::{Error, Result};
use crate::loader::Loader;
use crate::peers::{PeerGetter, PeerPicker};
use crate::proto::Request;
use crate::singleflight::Coalescer;
use crate::stats::{Counters, Event, GroupStats};
use crate::store::Store;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Configuration for a [`Group`].
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Capacity of the local cache in bytes (0 = unbounded)
    pub cache_bytes: usize,

    /// Upper bound on a single peer fetch; `None` leaves it to the transport
    pub peer_timeout: Option<Duration>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            cache_bytes: 2 << 10,
            peer_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl GroupConfig {
    /// Default configuration with a different cache size.
    pub fn with_cache_bytes(cache_bytes: usize) -> Self {
        Self {
            cache_bytes,
            ..Self::default()
        }
    }
}

/// A named cache namespace: bounded local store, loader and optional peers.
pub struct Group {
    name: String,
    loader: Box<dyn Loader>,
    main_cache: Store,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    flights: Coalescer<ByteView>,
    config: GroupConfig,
    counters: Counters,
}

impl Group {
    /// Create a group outside any registry.
    ///
    /// Most applications go through [`crate::Registry::new_group`] instead,
    /// which also makes the group reachable from the peer server.
    pub fn new(name: impl Into<String>, config: GroupConfig, loader: impl Loader) -> Self {
        Self {
            name: name.into(),
            loader: Box::new(loader),
            main_cache: Store::new(config.cache_bytes),
            peers: OnceLock::new(),
            flights: Coalescer::new(),
            config,
            counters: Counters::default(),
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group configuration.
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Wire the peer router into this group.
    ///
    /// # Panics
    ///
    /// Panics if peers were already registered; the router is fixed for
    /// the lifetime of the group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peers called more than once for group {}", self.name);
        }
    }

    /// True once a peer router has been registered.
    pub fn has_peers(&self) -> bool {
        self.peers.get().is_some()
    }

    /// Read `key` through the cache.
    #[instrument(skip(self), fields(group = %self.name))]
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }
        self.counters.record(&self.name, Event::Get);

        if let Some(value) = self.main_cache.get(key) {
            debug!("cache hit");
            self.counters.record(&self.name, Event::CacheHit);
            return Ok(value);
        }

        let (result, shared) = self.flights.run_shared(key, || self.load(key)).await;
        if shared {
            self.counters.record(&self.name, Event::LoadDeduplicated);
        }
        result
    }

    /// Counter snapshot.
    pub fn stats(&self) -> GroupStats {
        self.counters.snapshot()
    }

    /// Number of entries in the local cache.
    pub fn cached_entries(&self) -> usize {
        self.main_cache.len()
    }

    /// Bytes held by the local cache.
    pub fn cached_bytes(&self) -> usize {
        self.main_cache.used_bytes()
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => {
                    self.counters.record(&self.name, Event::PeerLoad);
                    return Ok(value);
                }
                Err(err) => {
                    self.counters.record(&self.name, Event::PeerError);
                    warn!(peer = peer.addr(), error = %err, "failed to get from peer, loading locally");
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let request = Request::new(self.name.as_str(), key);
        let fetch = peer.get(&request);

        let response = match self.config.peer_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
                Error::PeerUnavailable(format!("{} timed out after {:?}", peer.addr(), limit))
            })??,
            None => fetch.await?,
        };

        debug!(peer = peer.addr(), "loaded from peer");
        Ok(ByteView::from(response.value))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        match self.loader.load(key).await {
            Ok(bytes) => {
                self.counters.record(&self.name, Event::LocalLoad);
                let value = ByteView::from(bytes);
                self.populate_cache(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                self.counters.record(&self.name, Event::LocalLoadError);
                debug!(error = %err, "loader failed");
                Err(err)
            }
        }
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("has_peers", &self.has_peers())
            .finish()
    }
}
