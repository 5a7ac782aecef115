//! User-facing API server.
//!
//! `GET /api?key=<key>` reads the key through the group and answers with
//! the raw value bytes. Any failure is a 500 with the error text.

use bytes::Bytes;
use cache::Group;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use url::form_urlencoded;

/// Answer one API request.
pub async fn handle<B>(group: &Group, req: Request<B>) -> Response<Full<Bytes>> {
    if req.uri().path() != "/api" {
        return respond(StatusCode::NOT_FOUND, "text/plain; charset=utf-8", "not found");
    }

    let key = req
        .uri()
        .query()
        .and_then(|q| query_param(q, "key"))
        .unwrap_or_default();

    match group.get(&key).await {
        Ok(view) => respond(StatusCode::OK, "application/octet-stream", view.into_bytes()),
        Err(err) => respond(
            StatusCode::INTERNAL_SERVER_ERROR,
            "text/plain; charset=utf-8",
            err.to_string(),
        ),
    }
}

/// Bind `addr` and serve the API for `group`.
pub async fn serve(addr: &str, group: Arc<Group>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr, group = group.name(), "API server listening");

    loop {
        let (stream, remote) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let group = Arc::clone(&group);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let group = Arc::clone(&group);
                async move { Ok::<_, Infallible>(handle(&group, req).await) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!(%remote, "API connection error: {}", e);
            }
        });
    }
}

/// First value of `name` in a query string, form-decoded.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn respond(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
