//! Pool of HTTP peers.
//!
//! The pool owns this node's view of the cluster: the hash ring over all
//! peer addresses and one [`HttpGetter`] per peer. Both are rebuilt together
//! by [`HttpPool::set_peers`] and swapped under a single lock, so a lookup
//! sees either the old pair or the new one.

use crate::client::HttpGetter;
use crate::config::PoolConfig;
use crate::error::Result;
use cache::{PeerGetter, PeerPicker, Registry};
use corelib::HashRing;
use parking_lot::RwLock;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

struct PeerState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// HTTP peer pool: picks owning peers for keys and serves local groups.
pub struct HttpPool {
    /// This node's base URL, e.g. `http://10.0.0.1:8001`
    self_url: String,
    config: PoolConfig,
    pub(crate) registry: Arc<Registry>,
    client: Client,
    state: RwLock<PeerState>,
}

impl HttpPool {
    /// Create a pool for the node reachable at `self_url`, serving groups
    /// from `registry`.
    pub fn new(self_url: impl Into<String>, registry: Arc<Registry>, config: PoolConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let ring = HashRing::with_shared_partitioner(config.replicas, Arc::clone(&config.partitioner));

        Ok(Self {
            self_url: self_url.into(),
            config,
            registry,
            client,
            state: RwLock::new(PeerState {
                ring,
                getters: HashMap::new(),
            }),
        })
    }

    /// Replace the set of known peers (this node included).
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut ring = HashRing::with_shared_partitioner(
            self.config.replicas,
            Arc::clone(&self.config.partitioner),
        );
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(peer.as_str(), &self.config.base_path, self.client.clone());
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.state.write() = PeerState { ring, getters };
        info!(node = %self.self_url, peers = ?peers, "peer set updated");
    }

    /// Currently known peers.
    pub fn peers(&self) -> Vec<String> {
        self.state.read().ring.peers().to_vec()
    }

    /// Peer address owning `key` on the current ring, self included.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.state.read().ring.get(key).map(str::to_string)
    }

    /// This node's base URL.
    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    /// Path prefix served by this pool.
    pub fn base_path(&self) -> &str {
        &self.config.base_path
    }

    /// Registry the server resolves groups from.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.read();
        let peer = state.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }

        debug!(peer, key, "picked peer");
        state
            .getters
            .get(peer)
            .map(|getter| Arc::clone(getter) as Arc<dyn PeerGetter>)
    }
}

impl fmt::Debug for HttpPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPool")
            .field("self_url", &self.self_url)
            .field("config", &self.config)
            .field("peers", &self.peers())
            .finish()
    }
}
