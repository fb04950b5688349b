// cellvm-data - Persistent blob-keyed map
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistent maps keyed by [`Blob`], with prefix and range lookup.
//!
//! Holdings are stored as blob-maps keyed by the holder's
//! [`Address::to_blob`](crate::Address::to_blob) so that all holdings of an
//! account range can be scanned in key order.

use std::fmt;
use std::ops::Bound;
use std::sync::{Arc, OnceLock};

use crate::blob::Blob;
use crate::value::Value;

/// An immutable map with blob keys in byte order.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobMap {
    entries: Arc<im::OrdMap<Blob, Value>>,
}

// SAFETY: the only field is an `Arc<im::OrdMap<Blob, Value>>`. `im` shares nodes through
// atomic reference counts and never mutates a shared node, so it is
// `Send + Sync` whenever its elements are, and every `Value` variant is.
// Declaring it here stops the auto-trait check recursing through `Value`.
unsafe impl Send for BlobMap {}
unsafe impl Sync for BlobMap {}

static EMPTY_BLOB_MAP: OnceLock<BlobMap> = OnceLock::new();

impl BlobMap {
    /// The canonical empty blob-map.
    #[must_use]
    pub fn empty() -> BlobMap {
        EMPTY_BLOB_MAP
            .get_or_init(|| BlobMap {
                entries: Arc::new(im::OrdMap::new()),
            })
            .clone()
    }

    pub fn of<I, V>(pairs: I) -> BlobMap
    where
        I: IntoIterator<Item = (Blob, V)>,
        V: Into<Value>,
    {
        BlobMap::from_entries(pairs.into_iter().map(|(k, v)| (k, v.into())).collect())
    }

    fn from_entries(entries: im::OrdMap<Blob, Value>) -> BlobMap {
        if entries.is_empty() {
            BlobMap::empty()
        } else {
            BlobMap {
                entries: Arc::new(entries),
            }
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn assoc(&self, key: Blob, value: Value) -> BlobMap {
        BlobMap {
            entries: Arc::new(self.entries.update(key, value)),
        }
    }

    /// Remove `key`. Returns a handle to the same storage when `key` is absent.
    #[must_use]
    pub fn dissoc(&self, key: &[u8]) -> BlobMap {
        if !self.entries.contains_key(key) {
            return self.clone();
        }
        BlobMap::from_entries(self.entries.without(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Blob, &Value)> {
        self.entries.iter()
    }

    /// Entries whose key starts with `prefix`, in key order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a [u8]) -> impl Iterator<Item = (&'a Blob, &'a Value)> {
        self.entries
            .range::<_, [u8]>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(k, _)| k.starts_with(prefix))
    }

    /// Entries with `start <= key < end`.
    pub fn range<'a>(
        &'a self,
        start: &'a [u8],
        end: &'a [u8],
    ) -> impl Iterator<Item = (&'a Blob, &'a Value)> {
        self.entries
            .range::<_, [u8]>((Bound::Included(start), Bound::Excluded(end)))
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &BlobMap) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl fmt::Display for BlobMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#blob-map {{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", k, v)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for BlobMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
