//! Read-through cache groups.
//!
//! This crate holds everything a node needs apart from the network:
//! - [`ByteView`]: immutable value handed to callers
//! - [`lru`] / [`store`]: the byte-bounded local cache
//! - [`singleflight`]: collapses concurrent loads of one key
//! - [`Loader`], [`PeerPicker`], [`PeerGetter`]: the pluggable capabilities
//! - [`proto`]: the peer wire envelope
//! - [`Group`] and [`Registry`]: orchestration and lookup by name

pub mod byteview;
pub mod error;
pub mod group;
pub mod loader;
pub mod lru;
pub mod peers;
pub mod proto;
pub mod registry;
pub mod singleflight;
pub mod stats;
pub mod store;

pub use byteview::ByteView;
pub use error::{Error, Result};
pub use group::{Group, GroupConfig};
pub use loader::{Loader, LoaderFn};
pub use peers::{NoPeers, PeerGetter, PeerPicker};
pub use registry::Registry;
pub use singleflight::Coalescer;
pub use stats::GroupStats;
