// cellvm-data - Persistent map
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistent associative map from [`Value`] to [`Value`].
//!
//! Backed by an ordered tree so that iteration order depends only on the
//! keys, never on insertion history or hashing seeds.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::value::Value;

/// An immutable map with unique keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Map {
    entries: Arc<im::OrdMap<Value, Value>>,
}

// SAFETY: the only field is an `Arc<im::OrdMap<Value, Value>>`. `im` shares nodes through
// atomic reference counts and never mutates a shared node, so it is
// `Send + Sync` whenever its elements are, and every `Value` variant is.
// Declaring it here stops the auto-trait check recursing through `Value`.
unsafe impl Send for Map {}
unsafe impl Sync for Map {}

static EMPTY_MAP: OnceLock<Map> = OnceLock::new();

impl Map {
    /// The canonical empty map.
    #[must_use]
    pub fn empty() -> Map {
        EMPTY_MAP
            .get_or_init(|| Map {
                entries: Arc::new(im::OrdMap::new()),
            })
            .clone()
    }

    /// Build a map from key-value pairs. Later pairs replace earlier ones.
    pub fn of<I, K, V>(pairs: I) -> Map
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Map::from_entries(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn from_entries(entries: im::OrdMap<Value, Value>) -> Map {
        if entries.is_empty() {
            Map::empty()
        } else {
            Map {
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
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    /// Associate `key` with `value`, sharing every untouched subtree.
    #[must_use]
    pub fn assoc(&self, key: Value, value: Value) -> Map {
        Map {
            entries: Arc::new(self.entries.update(key, value)),
        }
    }

    /// Remove `key`. Returns a handle to the same storage when `key` is absent.
    #[must_use]
    pub fn dissoc(&self, key: &Value) -> Map {
        if !self.entries.contains_key(key) {
            return self.clone();
        }
        Map::from_entries(self.entries.without(key))
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.keys()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Map::from_entries(iter.into_iter().collect())
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", k, v)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Map{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keyword;

    fn kw(name: &str) -> Value {
        Value::Keyword(Keyword::new(name))
    }

    #[test]
    fn test_assoc_and_get() {
        let m = Map::empty().assoc(kw("a"), Value::from(1));
        assert_eq!(m.get(&kw("a")), Some(&Value::from(1)));
        assert_eq!(m.count(), 1);
        assert!(Map::empty().is_empty());
    }

    #[test]
    fn test_assoc_replaces() {
        let m = Map::of([(kw("a"), 1), (kw("a"), 2)]);
        assert_eq!(m.count(), 1);
        assert_eq!(m.get(&kw("a")), Some(&Value::from(2)));
    }

    #[test]
    fn test_dissoc_absent_key_shares_storage() {
        let m = Map::of([(kw("a"), 1)]);
        assert!(m.dissoc(&kw("b")).ptr_eq(&m));
    }

    #[test]
    fn test_dissoc_last_key_is_canonical_empty() {
        let m = Map::of([(kw("a"), 1)]);
        assert!(m.dissoc(&kw("a")).ptr_eq(&Map::empty()));
    }

    #[test]
    fn test_structural_equality() {
        let a = Map::of([(kw("x"), 1), (kw("y"), 2)]);
        let b = Map::of([(kw("y"), 2), (kw("x"), 1)]);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_display_is_key_ordered() {
        let m = Map::of([(kw("b"), 2), (kw("a"), 1)]);
        assert_eq!(m.to_string(), "{:a 1, :b 2}");
    }
}
