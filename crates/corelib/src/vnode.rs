//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Virtual nodes are a technique to improve load distribution in consistent hashing.
//! Instead of each physical peer having a single token on the ring, each peer has
//! `replicas` tokens. This provides:
//!
//! 1. **Better Load Distribution**: More tokens = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When peers join/leave, only a fraction of keys move
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(v) where v = number of vnodes per peer
//! - **Lookup**: O(log n) where n = total vnodes
//! - **Rebalancing**: O(k/p) keys move when a peer joins/leaves (k = total keys, p = peers)

use crate::partitioner::Partitioner;
use crate::token::Token;
use std::fmt;

/// A virtual node on the hash ring.
///
/// Represents a single token position owned by a physical peer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    ///
    /// This is the hash of `"{vnode_index}{peer}"`.
    pub token: Token,

    /// Address of the physical peer that owns this virtual node.
    pub peer: String,
}

impl VirtualNode {
    /// Create a new virtual node.
    #[inline]
    pub fn new(token: Token, peer: impl Into<String>) -> Self {
        Self {
            token,
            peer: peer.into(),
        }
    }

    /// Create a virtual node from a peer address and vnode index.
    ///
    /// # Algorithm
    ///
    /// 1. Format the label: decimal index immediately followed by the peer address
    /// 2. Hash the label with the ring's partitioner
    ///
    /// # Example
    /// ```rust
    /// use corelib::partitioner::Xxh3Partitioner;
    /// use corelib::VirtualNode;
    ///
    /// let vnode0 = VirtualNode::from_index(&Xxh3Partitioner, "http://node1:8001", 0);
    /// let vnode1 = VirtualNode::from_index(&Xxh3Partitioner, "http://node1:8001", 1);
    /// assert_ne!(vnode0.token, vnode1.token);
    /// ```
    pub fn from_index<P>(partitioner: &P, peer: &str, vnode_index: usize) -> Self
    where
        P: Partitioner + ?Sized,
    {
        let label = format!("{}{}", vnode_index, peer);
        Self::new(partitioner.partition(label.as_bytes()), peer)
    }

    /// Get the token position.
    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Get the owning peer address.
    #[inline]
    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(token={}, peer={})", self.token, self.peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::{FnPartitioner, Xxh3Partitioner};

    fn decimal(key: &[u8]) -> u64 {
        std::str::from_utf8(key).unwrap().parse().unwrap()
    }

    #[test]
    fn test_vnode_creation() {
        let vnode = VirtualNode::new(Token(100), "peer-a");
        assert_eq!(vnode.token(), Token(100));
        assert_eq!(vnode.peer(), "peer-a");
    }

    #[test]
    fn test_vnode_from_index() {
        let vnode0 = VirtualNode::from_index(&Xxh3Partitioner, "peer-a", 0);
        let vnode1 = VirtualNode::from_index(&Xxh3Partitioner, "peer-a", 1);

        assert_ne!(vnode0.token(), vnode1.token());
        assert_eq!(vnode0.peer(), vnode1.peer());
    }

    #[test]
    fn test_vnode_label_is_index_then_peer() {
        let p = FnPartitioner::new(decimal);
        let vnode = VirtualNode::from_index(&p, "6", 2);
        assert_eq!(vnode.token(), Token(26));
    }

    #[test]
    fn test_vnode_orders_by_token() {
        let vnode1 = VirtualNode::new(Token(100), "b");
        let vnode2 = VirtualNode::new(Token(200), "a");
        assert!(vnode1 < vnode2);
    }
}
