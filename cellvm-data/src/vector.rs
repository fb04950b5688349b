// cellvm-data - Persistent vector
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistent vectors, optimised for random access and append.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::list::List;
use crate::sequence::{Sequence, checked_index};
use crate::value::Value;

/// An immutable indexed vector.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vector {
    items: Arc<im::Vector<Value>>,
}

// SAFETY: the only field is an `Arc<im::Vector<Value>>`. `im` shares nodes through
// atomic reference counts and never mutates a shared node, so it is
// `Send + Sync` whenever its elements are, and every `Value` variant is.
// Declaring it here stops the auto-trait check recursing through `Value`.
unsafe impl Send for Vector {}
unsafe impl Sync for Vector {}

static EMPTY_VECTOR: OnceLock<Vector> = OnceLock::new();

impl Vector {
    /// The canonical empty vector.
    #[must_use]
    pub fn empty() -> Vector {
        EMPTY_VECTOR
            .get_or_init(|| Vector {
                items: Arc::new(im::Vector::new()),
            })
            .clone()
    }

    /// Build a vector holding `values` in the given order.
    pub fn of<I, T>(values: I) -> Vector
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Vector::from_items(values.into_iter().map(Into::into).collect())
    }

    pub(crate) fn from_items(items: im::Vector<Value>) -> Vector {
        if items.is_empty() {
            Vector::empty()
        } else {
            Vector {
                items: Arc::new(items),
            }
        }
    }

    #[must_use]
    pub fn last(&self) -> Option<&Value> {
        self.items.last()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Vector) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl Sequence for Vector {
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

    /// Appends at the end.
    fn conj(&self, value: Value) -> Self {
        let mut items = (*self.items).clone();
        items.push_back(value);
        Vector::from_items(items)
    }

    fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        Vector::from_items(self.items.iter().map(f).collect())
    }

    fn concat<S: Sequence>(&self, other: &S) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        let mut items = (*self.items).clone();
        items.extend(other.iter().cloned());
        Vector::from_items(items)
    }

    fn assoc(&self, index: i64, value: Value) -> Result<Self> {
        let i = checked_index(index, self.items.len())?;
        Ok(Vector::from_items(self.items.update(i, value)))
    }
}

impl FromIterator<Value> for Vector {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Vector::from_items(iter.into_iter().collect())
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conj_appends() {
        assert_eq!(Vector::of([1, 2]).conj(Value::from(3)), Vector::of([1, 2, 3]));
    }

    #[test]
    fn test_cons_returns_list() {
        let list = Vector::of([2, 3]).cons(Value::from(1));
        assert_eq!(list, List::of([1, 2, 3]));
    }

    #[test]
    fn test_concat() {
        let v = Vector::of([1, 2]).concat(&List::of([3, 4]));
        assert_eq!(v, Vector::of([1, 2, 3, 4]));
    }

    #[test]
    fn test_concat_empty_shares_receiver() {
        let v = Vector::of([1, 2]);
        assert!(v.concat(&Vector::empty()).ptr_eq(&v));
    }

    #[test]
    fn test_assoc_bounds() {
        let v = Vector::of([1, 2, 3]);
        assert_eq!(v.assoc(2, Value::from(0)).unwrap(), Vector::of([1, 2, 0]));
        assert!(v.assoc(3, Value::nil()).is_err());
        assert!(Vector::empty().assoc(0, Value::nil()).is_err());
    }

    #[test]
    fn test_list_and_vector_not_equal() {
        assert_ne!(
            Value::Vector(Vector::of([1, 2])),
            Value::List(List::of([1, 2]))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector::of([1, 2, 3]).to_string(), "[1 2 3]");
    }
}
