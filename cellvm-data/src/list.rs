// cellvm-data - Persistent list
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistent lists, optimised for access and change at the head.
//!
//! Lists are most importantly used for representing code as data. For
//! general manipulation of sequential data, prefer [`Vector`](crate::Vector).

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::sequence::{Sequence, checked_index};
use crate::value::Value;

/// An immutable list. Index 0 is the head.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct List {
    items: Arc<im::Vector<Value>>,
}

// SAFETY: the only field is an `Arc<im::Vector<Value>>`. `im` shares nodes through
// atomic reference counts and never mutates a shared node, so it is
// `Send + Sync` whenever its elements are, and every `Value` variant is.
// Declaring it here stops the auto-trait check recursing through `Value`.
unsafe impl Send for List {}
unsafe impl Sync for List {}

static EMPTY_LIST: OnceLock<List> = OnceLock::new();

impl List {
    /// The canonical empty list. Every call returns the same shared instance.
    #[must_use]
    pub fn empty() -> List {
        EMPTY_LIST
            .get_or_init(|| List {
                items: Arc::new(im::Vector::new()),
            })
            .clone()
    }

    /// Build a list holding `values` in the given order.
    pub fn of<I, T>(values: I) -> List
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        List::from_items(values.into_iter().map(Into::into).collect())
    }

    pub(crate) fn from_items(items: im::Vector<Value>) -> List {
        if items.is_empty() {
            List::empty()
        } else {
            List {
                items: Arc::new(items),
            }
        }
    }

    /// Everything after the head, or the empty list.
    #[must_use]
    pub fn rest(&self) -> List {
        if self.items.len() <= 1 {
            return List::empty();
        }
        List::from_items(self.items.skip(1))
    }

    /// True if both handles share the same underlying storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &List) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl Sequence for List {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    fn iter(&self) -> im::vector::Iter<'_, Value> {
        self.items.iter()
    }

    fn cons(&self, value: Value) -> List {
        let mut items = (*self.items).clone();
        items.push_front(value);
        List::from_items(items)
    }

    /// Adds at the head, like [`cons`](Sequence::cons).
    fn conj(&self, value: Value) -> Self {
        self.cons(value)
    }

    fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        List::from_items(self.items.iter().map(f).collect())
    }

    fn concat<S: Sequence>(&self, other: &S) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        let mut items = (*self.items).clone();
        items.extend(other.iter().cloned());
        List::from_items(items)
    }

    fn assoc(&self, index: i64, value: Value) -> Result<Self> {
        let i = checked_index(index, self.items.len())?;
        Ok(List::from_items(self.items.update(i, value)))
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List::from_items(iter.into_iter().collect())
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "List{}", self)
    }
}
