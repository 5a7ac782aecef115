//! Demo source of truth: a small, slow in-memory score table.

use cache::{Error, Loader, LoaderFn};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Name of the demo group.
pub const GROUP: &str = "scores";

fn scores() -> HashMap<&'static str, &'static str> {
    HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")])
}

/// Loader over the demo score table.
pub fn slow_db() -> impl Loader {
    let db = Arc::new(scores());
    LoaderFn::new(move |key: String| {
        let db = Arc::clone(&db);
        async move {
            info!("[SlowDB] search key {}", key);
            db.get(key.as_str())
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| Error::not_found(key))
        }
    })
}
