//! Source-of-truth abstraction.
//!
//! A group calls its loader on a local miss when no peer owns the key (or
//! the owning peer failed). Loaders report a missing key with
//! [`Error::NotFound`](crate::Error::NotFound) and any other failure with
//! [`Error::Loader`](crate::Error::Loader).

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;

/// Loads the authoritative value for a key.
#[async_trait]
pub trait Loader: Send + Sync + 'static {
    /// Load the bytes for `key`.
    async fn load(&self, key: &str) -> Result<Vec<u8>>;
}

/// Adapts an async closure into a [`Loader`].
///
/// # Example
///
/// ```rust
/// use cache::{Error, LoaderFn};
///
/// let loader = LoaderFn::new(|key: String| async move {
///     match key.as_str() {
///         "Tom" => Ok(b"630".to_vec()),
///         _ => Err(Error::not_found(key)),
///     }
/// });
/// ```
pub struct LoaderFn<F> {
    load: F,
}

impl<F> LoaderFn<F> {
    /// Wrap a closure.
    pub fn new(load: F) -> Self {
        Self { load }
    }
}

impl<F> fmt::Debug for LoaderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderFn").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> Loader for LoaderFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    async fn load(&self, key: &str) -> Result<Vec<u8>> {
        (self.load)(key.to_string()).await
    }
}
