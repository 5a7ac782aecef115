//! HTTP server side of the peer protocol.
//!
//! Serves `GET <base_path><group>/<key>` with both segments percent-encoded.
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | value found | 200 | encoded [`Response`] (`application/octet-stream`) |
//! | path without `/` after the group, bad encoding, empty key | 400 | text |
//! | group not registered | 404 | text |
//! | loader or internal failure | 500 | error text |

use crate::error::{Error, Result};
use crate::pool::HttpPool;
use bytes::Bytes;
use cache::proto::{self, Response as Envelope};
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

impl HttpPool {
    /// Answer one peer request.
    ///
    /// # Panics
    ///
    /// Panics if the path does not start with the pool's base path: the
    /// pool was mounted somewhere it does not belong.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        self.route(&method, &path).await
    }

    async fn route(&self, method: &Method, path: &str) -> Response<Full<Bytes>> {
        let Some(rest) = path.strip_prefix(self.base_path()) else {
            panic!("HttpPool serving unexpected path: {}", path);
        };
        info!(node = %self.self_url(), %method, path, "peer request");

        let Some((group_name, key)) = rest.split_once('/') else {
            return text(StatusCode::BAD_REQUEST, "bad request");
        };
        let (Ok(group_name), Ok(key)) = (urlencoding::decode(group_name), urlencoding::decode(key)) else {
            return text(StatusCode::BAD_REQUEST, "bad request");
        };

        let Some(group) = self.registry.group(&group_name) else {
            return text(StatusCode::NOT_FOUND, format!("no such group: {}", group_name));
        };

        let view = match group.get(&key).await {
            Ok(view) => view,
            Err(cache::Error::InvalidKey) => {
                return text(StatusCode::BAD_REQUEST, cache::Error::InvalidKey.to_string())
            }
            Err(err) => {
                debug!(group = %group_name, error = %err, "group get failed");
                return text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
            }
        };

        match proto::encode_response(&Envelope { value: view.to_vec() }) {
            Ok(body) => {
                let mut response = Response::new(Full::new(Bytes::from(body)));
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
                response
            }
            Err(err) => text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }

    /// Accept connections until the listener fails, serving each on its own task.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<()> {
        info!(node = %self.self_url(), addr = ?listener.local_addr().ok(), "peer server listening");

        loop {
            let (stream, remote) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let pool = Arc::clone(&self);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let pool = Arc::clone(&pool);
                    async move { Ok::<_, Infallible>(pool.handle(req).await) }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    warn!(%remote, "peer connection error: {}", e);
                }
            });
        }
    }

    /// Bind `addr` (e.g. `127.0.0.1:8001`) and serve on it.
    pub async fn bind_and_serve(self: Arc<Self>, addr: &str) -> Result<()> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr, e)))?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            error!(%addr, "failed to bind peer server: {}", e);
            Error::Io(e)
        })?;
        self.serve(listener).await
    }
}

fn text(status: StatusCode, body: impl Into<String>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.into())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}
