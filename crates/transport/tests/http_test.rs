//! End-to-end tests over real sockets.
//!
//! # Test Strategy
//!
//! 1. **Protocol**: status codes and envelope as seen by a plain HTTP client
//! 2. **Cluster**: a key owned by another node is fetched from it
//! 3. **Fallback**: a dead or misbehaving owner degrades to the local loader

use bytes::Bytes;
use cache::proto::{self, Request};
use cache::{Error, Group, LoaderFn, PeerGetter, PeerPicker, Registry};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use transport::{HttpGetter, HttpPool, PoolConfig, DEFAULT_BASE_PATH};

struct Node {
    url: String,
    pool: Arc<HttpPool>,
    group: Arc<Group>,
    loads: Arc<AtomicUsize>,
}

/// Start a node whose loader answers `"<tag>:<key>"`, except for "Missing".
async fn start_node(tag: &'static str) -> Node {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let registry = Arc::new(Registry::new());
    let group = registry
        .new_group(
            "scores",
            2 << 10,
            LoaderFn::new(move |key: String| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    match key.as_str() {
                        "Tom" => Ok(b"630".to_vec()),
                        "Missing" => Err(Error::not_found(key)),
                        _ => Ok(format!("{}:{}", tag, key).into_bytes()),
                    }
                }
            }),
        )
        .unwrap();

    let pool = Arc::new(HttpPool::new(url.clone(), registry, PoolConfig::default()).unwrap());
    tokio::spawn(Arc::clone(&pool).serve(listener));

    Node {
        url,
        pool,
        group,
        loads,
    }
}

/// An address nothing listens on.
fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    url
}

/// A peer that answers every request with the same status and body.
async fn start_fake_peer(status: StatusCode, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let service = service_fn(move |_req: hyper::Request<hyper::body::Incoming>| async move {
                    let mut response = Response::new(Full::new(Bytes::from_static(body)));
                    *response.status_mut() = status;
                    Ok::<_, Infallible>(response)
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    url
}

fn key_owned_by(pool: &HttpPool, owner: &str) -> String {
    (0..10_000)
        .map(|i| format!("key-{}", i))
        .find(|key| pool.owner_of(key).as_deref() == Some(owner))
        .expect("some key maps to every peer")
}

// ============================================================================
// Protocol Tests
// ============================================================================

#[tokio::test]
async fn test_peer_protocol_over_http() {
    let node = start_node("a").await;
    let base = format!("{}{}", node.url, node.pool.base_path());

    let res = reqwest::get(format!("{}scores/Tom", base)).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(
        res.headers()["content-type"],
        "application/octet-stream"
    );
    let envelope = proto::decode_response(&res.bytes().await.unwrap()).unwrap();
    assert_eq!(envelope.value, b"630");

    let res = reqwest::get(format!("{}unknown/Tom", base)).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    let res = reqwest::get(format!("{}onlyonesegment", base)).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let res = reqwest::get(format!("{}scores/Missing", base)).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "Missing not exist");
}

// ============================================================================
// Cluster Tests
// ============================================================================

#[tokio::test]
async fn test_key_owned_by_other_node_is_fetched_from_it() {
    let a = start_node("a").await;
    let b = start_node("b").await;
    let peers = [a.url.clone(), b.url.clone()];
    for node in [&a, &b] {
        node.pool.set_peers(peers.clone());
        node.group.register_peers(Arc::clone(&node.pool) as Arc<dyn PeerPicker>);
    }

    let key = key_owned_by(&a.pool, &b.url);
    let expected = format!("b:{}", key);

    assert_eq!(a.group.get(&key).await.unwrap(), expected.as_str());
    assert_eq!(a.group.get(&key).await.unwrap(), expected.as_str());

    assert_eq!(a.loads.load(Ordering::SeqCst), 0);
    assert_eq!(b.loads.load(Ordering::SeqCst), 1, "owner caches after first load");
    assert_eq!(a.group.cached_entries(), 0, "remote values are not mirrored");
    assert_eq!(a.group.stats().peer_loads, 2);
}

#[tokio::test]
async fn test_key_owned_locally_is_loaded_locally() {
    let a = start_node("a").await;
    let b = start_node("b").await;
    let peers = [a.url.clone(), b.url.clone()];
    for node in [&a, &b] {
        node.pool.set_peers(peers.clone());
        node.group.register_peers(Arc::clone(&node.pool) as Arc<dyn PeerPicker>);
    }

    let key = key_owned_by(&a.pool, &a.url);

    assert_eq!(a.group.get(&key).await.unwrap(), format!("a:{}", key).as_str());
    assert_eq!(b.loads.load(Ordering::SeqCst), 0);
    assert_eq!(a.group.stats().peer_loads, 0);
}

// ============================================================================
// Fallback Tests
// ============================================================================

#[tokio::test]
async fn test_dead_owner_falls_back_to_local_loader() {
    let a = start_node("a").await;
    let dead = dead_url();
    a.pool.set_peers([a.url.clone(), dead.clone()]);
    a.group.register_peers(Arc::clone(&a.pool) as Arc<dyn PeerPicker>);

    let key = key_owned_by(&a.pool, &dead);

    assert_eq!(a.group.get(&key).await.unwrap(), format!("a:{}", key).as_str());
    let stats = a.group.stats();
    assert_eq!(stats.peer_errors, 1);
    assert_eq!(stats.local_loads, 1);
    assert_eq!(a.group.cached_entries(), 1);
}

#[tokio::test]
async fn test_garbage_envelope_is_decode_error() {
    let peer = start_fake_peer(StatusCode::OK, b"\xff\xff\xff\xff\xff\xff\xff\xff\xff").await;
    let getter = HttpGetter::new(peer, DEFAULT_BASE_PATH, reqwest::Client::new());

    let err = getter.get(&Request::new("scores", "Tom")).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_error_status_is_peer_unavailable() {
    let peer = start_fake_peer(StatusCode::INTERNAL_SERVER_ERROR, b"boom").await;
    let getter = HttpGetter::new(peer, DEFAULT_BASE_PATH, reqwest::Client::new());

    let err = getter.get(&Request::new("scores", "Tom")).await.unwrap_err();
    assert!(matches!(err, Error::PeerUnavailable(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_misbehaving_owner_falls_back_to_local_loader() {
    let cases = [
        (StatusCode::OK, &b"\xff\xff\xff\xff\xff\xff\xff\xff\xff"[..]),
        (StatusCode::INTERNAL_SERVER_ERROR, &b"boom"[..]),
    ];

    for (status, body) in cases {
        let a = start_node("a").await;
        let owner = start_fake_peer(status, body).await;
        a.pool.set_peers([a.url.clone(), owner.clone()]);
        a.group.register_peers(Arc::clone(&a.pool) as Arc<dyn PeerPicker>);

        let key = key_owned_by(&a.pool, &owner);

        assert_eq!(a.group.get(&key).await.unwrap(), format!("a:{}", key).as_str());
        let stats = a.group.stats();
        assert_eq!(stats.peer_errors, 1, "status {}", status);
        assert_eq!(stats.local_loads, 1);
    }
}
