// cellvm-data - Persistent set
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistent sets of [`Value`]s.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::value::Value;

/// An immutable set in value order.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Set {
    items: Arc<im::OrdSet<Value>>,
}

// SAFETY: the only field is an `Arc<im::OrdSet<Value>>`. `im` shares nodes through
// atomic reference counts and never mutates a shared node, so it is
// `Send + Sync` whenever its elements are, and every `Value` variant is.
// Declaring it here stops the auto-trait check recursing through `Value`.
unsafe impl Send for Set {}
unsafe impl Sync for Set {}

static EMPTY_SET: OnceLock<Set> = OnceLock::new();

impl Set {
    #[must_use]
    pub fn empty() -> Set {
        EMPTY_SET
            .get_or_init(|| Set {
                items: Arc::new(im::OrdSet::new()),
            })
            .clone()
    }

    pub fn of<I, T>(values: I) -> Set
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let items: im::OrdSet<Value> = values.into_iter().map(Into::into).collect();
        if items.is_empty() {
            Set::empty()
        } else {
            Set {
                items: Arc::new(items),
            }
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    /// Add `value`. Returns a handle to the same storage when already present.
    #[must_use]
    pub fn include(&self, value: Value) -> Set {
        if self.items.contains(&value) {
            return self.clone();
        }
        Set {
            items: Arc::new(self.items.update(value)),
        }
    }

    #[must_use]
    pub fn exclude(&self, value: &Value) -> Set {
        if !self.items.contains(value) {
            return self.clone();
        }
        let items = self.items.without(value);
        if items.is_empty() {
            Set::empty()
        } else {
            Set {
                items: Arc::new(items),
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Set) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Set{}", self)
    }
}
