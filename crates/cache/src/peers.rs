//! Peer routing and fetching capabilities.
//!
//! A [`PeerPicker`] decides which remote peer owns a key; a [`PeerGetter`]
//! fetches a (group, key) pair from one peer. The HTTP implementation lives
//! in the `transport` crate; tests substitute in-memory fakes.

use crate::error::Result;
use crate::proto::{Request, Response};
use async_trait::async_trait;
use std::sync::Arc;

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync + 'static {
    /// Return the owning peer, or `None` when no remote peer owns `key`
    /// (empty ring, or this node owns it).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches values from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync + 'static {
    /// Fetch `request.key` from `request.group` on the peer.
    async fn get(&self, request: &Request) -> Result<Response>;

    /// Address of the peer, for logging.
    fn addr(&self) -> &str;
}

/// Picker that never selects a peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPeers;

impl PeerPicker for NoPeers {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
        None
    }
}
