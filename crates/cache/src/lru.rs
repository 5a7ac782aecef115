//! Byte-bounded least-recently-used cache.
//!
//! Each entry costs `key.len() + value.len()` bytes. After every insert the
//! oldest entries are evicted until the total fits in `max_bytes`. A
//! `max_bytes` of zero disables eviction. Ordering is delegated to the
//! `lru` crate; this type only does the byte accounting.
//!
//! Not thread-safe; [`crate::store::Store`] wraps it in a mutex.

use crate::byteview::ByteView;
use std::fmt;

/// Callback run for every entry evicted by capacity pressure.
pub type OnEvicted = Box<dyn FnMut(&str, &ByteView) + Send>;

/// Byte-bounded LRU cache of [`ByteView`] values.
pub struct LruCache {
    max_bytes: usize,
    used_bytes: usize,
    entries: ::lru::LruCache<String, ByteView>,
    on_evicted: Option<OnEvicted>,
}

impl LruCache {
    /// Create a cache holding at most `max_bytes` (0 = unbounded).
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            entries: ::lru::LruCache::unbounded(),
            on_evicted: None,
        }
    }

    /// Create a cache that reports evictions to `on_evicted`.
    pub fn with_eviction_callback(max_bytes: usize, on_evicted: OnEvicted) -> Self {
        Self {
            on_evicted: Some(on_evicted),
            ..Self::new(max_bytes)
        }
    }

    /// Look up a key, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        self.entries.get(key).cloned()
    }

    /// Insert or replace a value, then evict until within capacity.
    pub fn add(&mut self, key: impl Into<String>, value: ByteView) {
        let key = key.into();
        let key_len = key.len();
        let value_len = value.len();

        match self.entries.put(key, value) {
            Some(old) => {
                self.used_bytes = self.used_bytes - old.len() + value_len;
            }
            None => {
                self.used_bytes += key_len + value_len;
            }
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    /// Evict the least recently used entry.
    pub fn remove_oldest(&mut self) -> Option<(String, ByteView)> {
        let (key, value) = self.entries.pop_lru()?;
        self.used_bytes -= key.len() + value.len();
        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&key, &value);
        }
        Some((key, value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently accounted to entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Capacity in bytes (0 = unbounded).
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

impl fmt::Debug for LruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_get_hit_and_miss() {
        let mut cache = LruCache::new(0);
        cache.add("key1", ByteView::from("1234"));

        assert_eq!(cache.get("key1").unwrap(), "1234");
        assert!(cache.get("key2").is_none());
        assert_eq!(cache.used_bytes(), 8);
    }

    #[test]
    fn test_evicts_oldest_when_over_capacity() {
        let (k1, k2, k3) = ("key1", "key2", "k3");
        let (v1, v2, v3) = ("value1", "value2", "v3");
        let capacity = k1.len() + k2.len() + v1.len() + v2.len();

        let mut cache = LruCache::new(capacity);
        cache.add(k1, ByteView::from(v1));
        cache.add(k2, ByteView::from(v2));
        cache.add(k3, ByteView::from(v3));

        assert!(cache.get(k1).is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache = LruCache::new(12);
        cache.add("a", ByteView::from("11111"));
        cache.add("b", ByteView::from("22222"));
        cache.get("a");
        cache.add("c", ByteView::from("3"));

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_update_adjusts_bytes() {
        let mut cache = LruCache::new(0);
        cache.add("key", ByteView::from("short"));
        cache.add("key", ByteView::from("much longer"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), 3 + 11);
    }

    #[test]
    fn test_eviction_callback() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let mut cache = LruCache::with_eviction_callback(
            10,
            Box::new(move |key, _| sink.lock().unwrap().push(key.to_string())),
        );

        cache.add("key1", ByteView::from("123456"));
        cache.add("k2", ByteView::from("k2"));
        cache.add("k3", ByteView::from("k3"));
        cache.add("k4", ByteView::from("k4"));

        assert_eq!(*evicted.lock().unwrap(), vec!["key1", "k2"]);
    }

    #[test]
    fn test_oversized_entry_is_not_kept() {
        let mut cache = LruCache::new(4);
        cache.add("big", ByteView::from("too large"));

        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
    }

    proptest! {
        #[test]
        fn prop_used_bytes_stay_within_capacity(
            max_bytes in 1usize..64,
            ops in prop::collection::vec(("[a-d]{1,3}", "[a-z]{0,12}"), 1..64),
        ) {
            let mut cache = LruCache::new(max_bytes);
            for (key, value) in ops {
                cache.add(key, ByteView::from(value.as_str()));
                prop_assert!(cache.used_bytes() <= max_bytes);
            }

            let accounted = cache.used_bytes();
            let mut drained = 0;
            while let Some((key, value)) = cache.remove_oldest() {
                drained += key.len() + value.len();
            }
            prop_assert_eq!(drained, accounted);
            prop_assert_eq!(cache.used_bytes(), 0);
        }
    }
}
