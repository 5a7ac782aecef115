//! HTTP client side of the peer protocol.

use async_trait::async_trait;
use cache::proto::{self, Request, Response};
use cache::{Error, PeerGetter, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

/// Fetches values from one remote peer over HTTP.
///
/// One getter exists per known peer; all getters of a pool share one
/// connection-pooling [`Client`].
#[derive(Debug, Clone)]
pub struct HttpGetter {
    peer: String,
    base_url: String,
    client: Client,
}

impl HttpGetter {
    /// Create a getter for `peer` (e.g. `http://10.0.0.2:8001`) serving
    /// under `base_path`.
    pub fn new(peer: impl Into<String>, base_path: &str, client: Client) -> Self {
        let peer = peer.into();
        let base_url = format!("{}{}", peer, base_path);
        Self {
            peer,
            base_url,
            client,
        }
    }

    /// URL requested for a (group, key) pair.
    pub fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    #[instrument(skip(self, request), fields(peer = %self.peer, group = %request.group))]
    async fn get(&self, request: &Request) -> Result<Response> {
        let url = self.url_for(&request.group, &request.key);

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::PeerUnavailable(format!("{}: {}", url, e)))?;

        if res.status() != StatusCode::OK {
            return Err(Error::PeerUnavailable(format!(
                "server returned: {}",
                res.status()
            )));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| Error::PeerUnavailable(format!("reading response body: {}", e)))?;

        debug!(bytes = body.len(), "peer responded");
        proto::decode_response(&body)
    }

    fn addr(&self) -> &str {
        &self.peer
    }
}
