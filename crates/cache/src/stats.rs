//! Per-group counters.
//!
//! Every event is counted twice: in an atomic snapshot readable through
//! [`crate::Group::stats`], and through the `metrics` facade labelled with
//! the group name so an installed exporter can pick it up.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of a group's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    /// Calls to `get` with a valid key
    pub gets: u64,
    /// Gets answered from the local cache
    pub cache_hits: u64,
    /// Values fetched from a remote peer
    pub peer_loads: u64,
    /// Remote fetches that failed and fell back to the loader
    pub peer_errors: u64,
    /// Successful loader calls
    pub local_loads: u64,
    /// Failed loader calls
    pub local_load_errors: u64,
    /// Gets that waited on another caller's load
    pub loads_deduplicated: u64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Event {
    Get,
    CacheHit,
    PeerLoad,
    PeerError,
    LocalLoad,
    LocalLoadError,
    LoadDeduplicated,
}

impl Event {
    fn metric_name(self) -> &'static str {
        match self {
            Event::Get => "ccache_gets_total",
            Event::CacheHit => "ccache_cache_hits_total",
            Event::PeerLoad => "ccache_peer_loads_total",
            Event::PeerError => "ccache_peer_errors_total",
            Event::LocalLoad => "ccache_local_loads_total",
            Event::LocalLoadError => "ccache_local_load_errors_total",
            Event::LoadDeduplicated => "ccache_loads_deduplicated_total",
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    local_loads: AtomicU64,
    local_load_errors: AtomicU64,
    loads_deduplicated: AtomicU64,
}

impl Counters {
    pub(crate) fn record(&self, group: &str, event: Event) {
        let counter = match event {
            Event::Get => &self.gets,
            Event::CacheHit => &self.cache_hits,
            Event::PeerLoad => &self.peer_loads,
            Event::PeerError => &self.peer_errors,
            Event::LocalLoad => &self.local_loads,
            Event::LocalLoadError => &self.local_load_errors,
            Event::LoadDeduplicated => &self.loads_deduplicated,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(event.metric_name(), "group" => group.to_string()).increment(1);
    }

    pub(crate) fn snapshot(&self) -> GroupStats {
        GroupStats {
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            local_load_errors: self.local_load_errors.load(Ordering::Relaxed),
            loads_deduplicated: self.loads_deduplicated.load(Ordering::Relaxed),
        }
    }
}
