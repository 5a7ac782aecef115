//! Hash ring data structure.
//!
//! Holds the sorted token sequence plus a token -> peer table. A ring is
//! always built for a complete peer set: [`HashRing::add`] replaces the
//! previous contents instead of merging into them, so the same peer set
//! always produces the same ring.

use crate::error::{Error, Result};
use crate::partitioner::{Partitioner, Xxh3Partitioner};
use crate::token::Token;
use crate::vnode::VirtualNode;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Virtual nodes per peer when nothing else is configured.
pub const DEFAULT_REPLICAS: usize = 50;

/// Consistent hash ring mapping keys to peer addresses.
///
/// # Example
///
/// ```rust
/// use corelib::ring::HashRing;
///
/// let mut ring = HashRing::default();
/// ring.add(["http://a:8001", "http://b:8002"]);
///
/// let owner = ring.get("Tom").unwrap();
/// assert_eq!(ring.get("Tom"), Some(owner));
/// ```
#[derive(Clone)]
pub struct HashRing {
    replicas: usize,
    partitioner: Arc<dyn Partitioner>,
    /// Sorted token positions. May contain duplicates on hash collision.
    tokens: Vec<Token>,
    owners: HashMap<Token, String>,
    peers: Vec<String>,
}

impl HashRing {
    /// Create an empty ring.
    ///
    /// A ring with zero replicas never places a token and answers every
    /// lookup with `None`; use [`RingBuilder`] to have that rejected.
    pub fn new(replicas: usize, partitioner: impl Partitioner) -> Self {
        Self::with_shared_partitioner(replicas, Arc::new(partitioner))
    }

    /// Create an empty ring that shares an existing partitioner.
    pub fn with_shared_partitioner(replicas: usize, partitioner: Arc<dyn Partitioner>) -> Self {
        Self {
            replicas,
            partitioner,
            tokens: Vec::new(),
            owners: HashMap::new(),
            peers: Vec::new(),
        }
    }

    /// Replace the ring contents with the given peer set.
    ///
    /// For every peer, `replicas` virtual nodes are hashed and placed, then
    /// all tokens are sorted. When two virtual nodes hash to the same token
    /// the one inserted later owns it.
    ///
    /// # Performance
    /// - **Time**: O(p * r * log(p * r)) for p peers and r replicas
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tokens.clear();
        self.owners.clear();
        self.peers.clear();

        for peer in peers {
            let peer = peer.as_ref();
            if self.peers.iter().all(|p| p != peer) {
                self.peers.push(peer.to_string());
            }
            for index in 0..self.replicas {
                let vnode = VirtualNode::from_index(self.partitioner.as_ref(), peer, index);
                self.tokens.push(vnode.token);
                self.owners.insert(vnode.token, vnode.peer);
            }
        }

        self.tokens.sort_unstable();
    }

    /// Find the peer that owns `key`.
    ///
    /// Hashes the key and picks the first token at or after the hash,
    /// wrapping to the smallest token when the hash is past the last one.
    /// Returns `None` only when the ring is empty.
    ///
    /// # Performance
    /// - **Time**: O(log n) binary search over n tokens
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lookup(key.as_bytes())
    }

    /// Byte-key variant of [`HashRing::get`].
    pub fn lookup(&self, key: &[u8]) -> Option<&str> {
        if self.tokens.is_empty() {
            return None;
        }

        let hash = self.partitioner.partition(key);
        let idx = self.tokens.partition_point(|token| *token < hash);
        let token = self.tokens[idx % self.tokens.len()];

        self.owners.get(&token).map(String::as_str)
    }

    /// Distinct peers on the ring, in insertion order.
    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    /// Number of distinct peers.
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Number of token positions (virtual nodes) on the ring.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// True when no peer has been placed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Virtual nodes per peer.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// All (token, peer) pairs in ring order. Intended for debugging.
    pub fn tokens(&self) -> Vec<(Token, &str)> {
        self.tokens
            .iter()
            .filter_map(|t| self.owners.get(t).map(|p| (*t, p.as_str())))
            .collect()
    }

    /// Name of the hash function in use.
    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS, Xxh3Partitioner)
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("partitioner", &self.partitioner.name())
            .field("peers", &self.peers)
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

/// Builder for [`HashRing`] that validates its inputs.
///
/// # Example
///
/// ```rust
/// use corelib::ring::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_replicas(8)
///     .add_peer("http://a:8001")
///     .add_peer("http://b:8002")
///     .build()
///     .unwrap();
/// assert_eq!(ring.token_count(), 16);
/// ```
pub struct RingBuilder {
    replicas: usize,
    partitioner: Arc<dyn Partitioner>,
    peers: Vec<String>,
}

impl RingBuilder {
    /// Start a builder with [`DEFAULT_REPLICAS`] and the XXH3 partitioner.
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            partitioner: Arc::new(Xxh3Partitioner),
            peers: Vec::new(),
        }
    }

    /// Set the number of virtual nodes per peer.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Set the hash function.
    pub fn with_partitioner(mut self, partitioner: impl Partitioner) -> Self {
        self.partitioner = Arc::new(partitioner);
        self
    }

    /// Set a shared hash function.
    pub fn with_shared_partitioner(mut self, partitioner: Arc<dyn Partitioner>) -> Self {
        self.partitioner = partitioner;
        self
    }

    /// Add one peer address.
    pub fn add_peer(mut self, peer: impl Into<String>) -> Self {
        self.peers.push(peer.into());
        self
    }

    /// Add several peer addresses.
    pub fn add_peers<I, S>(mut self, peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.peers.extend(peers.into_iter().map(Into::into));
        self
    }

    /// Build the ring.
    ///
    /// # Errors
    /// - [`Error::InvalidConfig`] if the replica count is zero
    /// - [`Error::InvalidPeer`] if any peer address is empty
    pub fn build(self) -> Result<HashRing> {
        if self.replicas == 0 {
            return Err(Error::InvalidConfig(
                "replica count must be at least 1".to_string(),
            ));
        }
        if self.peers.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::InvalidPeer("peer address is empty".to_string()));
        }

        let mut ring = HashRing::with_shared_partitioner(self.replicas, self.partitioner);
        ring.add(&self.peers);
        Ok(ring)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
