//! Wire envelope exchanged between peers.
//!
//! Peers address values by URL path, so only [`Response`] travels as a
//! body. [`Request`] carries the same (group, key) pair inside the process
//! and is kept encodable for symmetry.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A (group, key) lookup addressed to a peer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Request {
    pub group: String,
    pub key: String,
}

impl Request {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }
}

/// A peer's answer: the cached value bytes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub value: Vec<u8>,
}

/// Encode a response body.
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    bincode::serialize(response).map_err(|e| Error::Internal(format!("encoding response: {}", e)))
}

/// Decode a response body.
pub fn decode_response(body: &[u8]) -> Result<Response> {
    bincode::deserialize(body).map_err(|e| Error::Decode(e.to_string()))
}

/// Encode a request.
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    bincode::serialize(request).map_err(|e| Error::Internal(format!("encoding request: {}", e)))
}

/// Decode a request.
pub fn decode_request(body: &[u8]) -> Result<Request> {
    bincode::deserialize(body).map_err(|e| Error::Decode(e.to_string()))
}
