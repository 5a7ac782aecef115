//! Request coalescing ("single flight") for concurrent loads.
//!
//! The first caller for a key becomes the leader and runs the load; every
//! caller that arrives while the leader's record is in the table waits for
//! the leader's result instead of loading again. The record is removed as
//! soon as the leader finishes, so the next call starts a fresh wave.
//! Results are never cached here.
//!
//! # Locking
//!
//! The table is behind one `parking_lot::Mutex`, held only to look up,
//! insert or remove a record. The load itself runs without the lock.
//!
//! # Cancellation
//!
//! If the leader's future is dropped mid-load, its guard still removes the
//! record and the closed channel wakes the waiters. A woken waiter goes back
//! to the table: the first one becomes the next leader and runs its own load,
//! the rest join that new wave. A dropped caller never turns into an error
//! for anyone else.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::watch;
use tracing::debug;

type Slot<V> = Option<Result<V>>;

enum Role<V> {
    Leader(watch::Sender<Slot<V>>),
    Waiter(watch::Receiver<Slot<V>>),
}

/// Deduplicates concurrent loads for the same key.
pub struct Coalescer<V> {
    calls: Mutex<HashMap<String, watch::Receiver<Slot<V>>>>,
}

impl<V> Coalescer<V>
where
    V: Clone + Send + Sync,
{
    /// Create an empty coalescer.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Run `load` for `key` unless a load for `key` is already in flight,
    /// in which case wait for that load and return its result.
    pub async fn run<F, Fut>(&self, key: &str, load: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        self.run_shared(key, load).await.0
    }

    /// Like [`Coalescer::run`], also reporting whether the result came from
    /// another caller's load (`true`) or this caller's own (`false`).
    pub async fn run_shared<F, Fut>(&self, key: &str, load: F) -> (Result<V>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let mut load = Some(load);
        loop {
            let role = {
                let mut calls = self.calls.lock();
                match calls.get(key) {
                    Some(rx) => Role::Waiter(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        calls.insert(key.to_string(), rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Waiter(rx) => match Self::wait(rx).await {
                    Some(result) => return (result, true),
                    None => debug!(key, "in-flight load dropped, retrying"),
                },
                Role::Leader(tx) => {
                    let _guard = CallGuard {
                        calls: &self.calls,
                        key,
                    };
                    let Some(load) = load.take() else {
                        return (Err(Error::Internal(format!("load for {} already consumed", key))), false);
                    };
                    let result = load().await;
                    tx.send_replace(Some(result.clone()));
                    return (result, false);
                }
            }
        }
    }

    /// Number of loads currently in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }

    /// Leader's result, or `None` if the leader went away without one.
    async fn wait(mut rx: watch::Receiver<Slot<V>>) -> Option<Result<V>> {
        match rx.wait_for(Option::is_some).await {
            Ok(slot) => (*slot).clone(),
            Err(_) => None,
        }
    }
}

impl<V> Default for Coalescer<V>
where
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for Coalescer<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coalescer")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

/// Removes the leader's record when the leader finishes or is dropped.
struct CallGuard<'a, V> {
    calls: &'a Mutex<HashMap<String, watch::Receiver<Slot<V>>>>,
    key: &'a str,
}

impl<V> Drop for CallGuard<'_, V> {
    fn drop(&mut self) {
        self.calls.lock().remove(self.key);
    }
}
