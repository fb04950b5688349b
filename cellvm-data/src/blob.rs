// cellvm-data - Blobs and account addresses
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Immutable byte strings and account addresses.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An immutable, cheaply cloned byte string.
///
/// Blobs order lexicographically by byte, which is what lets a
/// [`BlobMap`](crate::BlobMap) answer prefix and range queries.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Blob(Arc<[u8]>);

impl Blob {
    /// Create a blob from raw bytes.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Blob(bytes.into())
    }

    /// Parse a blob from a hex string (with or without a `0x` prefix).
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(digits).ok().map(Blob::from)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.0.starts_with(prefix)
    }

    /// Lowercase hex rendering without prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl Borrow<[u8]> for Blob {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Blob::new(bytes)
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Blob::new(bytes)
    }
}

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob({})", self)
    }
}

/// An account address: a dense index into the ledger's account vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(u64);

impl Address {
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Address(index)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Position of this account in the state's account vector.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// Big-endian 8 byte key, used to index holdings by account.
    #[must_use]
    pub fn to_blob(self) -> Blob {
        Blob::new(self.0.to_be_bytes().to_vec())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
