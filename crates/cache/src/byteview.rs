//! Immutable view over cached bytes.

use bytes::Bytes;
use std::fmt;

/// Read-only snapshot of a cached value.
///
/// Backed by [`Bytes`], so clones share one immutable buffer and no caller
/// can mutate what the cache holds. [`ByteView::to_vec`] hands out an
/// owned copy for callers that need to modify the data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Number of bytes in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the view holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy the bytes into a new vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Take the underlying shared buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(value: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(value),
        }
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for ByteView {
    fn from(value: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(value),
        }
    }
}

impl From<&str> for ByteView {
    fn from(value: &str) -> Self {
        value.as_bytes().into()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq<[u8]> for ByteView {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<str> for ByteView {
    fn eq(&self, other: &str) -> bool {
        self.as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for ByteView {
    fn eq(&self, other: &&str) -> bool {
        self.as_slice() == other.as_bytes()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_does_not_alias() {
        let view = ByteView::from("630");
        let mut copy = view.to_vec();
        copy[0] = b'9';

        assert_eq!(view, "630");
        assert_eq!(copy, b"930");
    }

    #[test]
    fn test_from_slice_copies_input() {
        let mut source = vec![1u8, 2, 3];
        let view = ByteView::from(source.as_slice());
        source[0] = 42;

        assert_eq!(view.as_slice(), &[1, 2, 3]);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_display_is_lossy_utf8() {
        assert_eq!(ByteView::from("589").to_string(), "589");
        assert!(ByteView::default().is_empty());
    }
}
