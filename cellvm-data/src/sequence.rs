// cellvm-data - Sequence capability shared by lists and vectors
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The [`Sequence`] trait and the closed [`Seq`] variant set.
//!
//! Lists and vectors are both ordered, duplicate-permitting and persistent.
//! They differ in where `conj` adds: a [`List`] grows at the front, a
//! [`Vector`] grows at the back. Code that does not care which one it holds
//! works through [`Seq`].

use crate::error::Result;
use crate::list::List;
use crate::value::Value;
use crate::vector::Vector;

/// Operations common to every persistent sequence.
///
/// Every operation returns a new sequence and leaves the receiver untouched.
pub trait Sequence: Sized {
    /// Number of elements.
    fn count(&self) -> usize;

    /// Element at `index`, if in range.
    fn get(&self, index: usize) -> Option<&Value>;

    /// Iterate elements in positional order.
    fn iter(&self) -> im::vector::Iter<'_, Value>;

    /// Prepend `value`, always producing a list.
    fn cons(&self, value: Value) -> List;

    /// Add `value` at this sequence's natural growth end.
    fn conj(&self, value: Value) -> Self;

    /// Transform each element, preserving count and order.
    fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value) -> Value;

    /// Append the elements of `other` after this sequence's elements.
    fn concat<S: Sequence>(&self, other: &S) -> Self;

    /// Replace the element at `index`.
    ///
    /// Fails with [`DataError::IndexOutOfBounds`](crate::DataError::IndexOutOfBounds)
    /// when `index` is negative or not less than the count.
    fn assoc(&self, index: i64, value: Value) -> Result<Self>;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    fn first(&self) -> Option<&Value> {
        self.get(0)
    }

    fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }
}

/// Check `index` against `length`, returning a usable position.
pub(crate) fn checked_index(index: i64, length: usize) -> Result<usize> {
    match usize::try_from(index) {
        Ok(i) if i < length => Ok(i),
        _ => Err(crate::DataError::IndexOutOfBounds { index, length }),
    }
}

/// Either kind of sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Seq {
    List(List),
    Vector(Vector),
}

impl Seq {
    /// Wrap a sequence-valued [`Value`], or `None` for any other value.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Seq> {
        match value {
            Value::List(l) => Some(Seq::List(l.clone())),
            Value::Vector(v) => Some(Seq::Vector(v.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Seq::List(l) => Value::List(l),
            Seq::Vector(v) => Value::Vector(v),
        }
    }
}

impl Sequence for Seq {
    fn count(&self) -> usize {
        match self {
            Seq::List(l) => l.count(),
            Seq::Vector(v) => v.count(),
        }
    }

    fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Seq::List(l) => l.get(index),
            Seq::Vector(v) => v.get(index),
        }
    }

    fn iter(&self) -> im::vector::Iter<'_, Value> {
        match self {
            Seq::List(l) => l.iter(),
            Seq::Vector(v) => v.iter(),
        }
    }

    fn cons(&self, value: Value) -> List {
        match self {
            Seq::List(l) => l.cons(value),
            Seq::Vector(v) => v.cons(value),
        }
    }

    fn conj(&self, value: Value) -> Self {
        match self {
            Seq::List(l) => Seq::List(l.conj(value)),
            Seq::Vector(v) => Seq::Vector(v.conj(value)),
        }
    }

    fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        match self {
            Seq::List(l) => Seq::List(l.map(f)),
            Seq::Vector(v) => Seq::Vector(v.map(f)),
        }
    }

    fn concat<S: Sequence>(&self, other: &S) -> Self {
        match self {
            Seq::List(l) => Seq::List(l.concat(other)),
            Seq::Vector(v) => Seq::Vector(v.concat(other)),
        }
    }

    fn assoc(&self, index: i64, value: Value) -> Result<Self> {
        Ok(match self {
            Seq::List(l) => Seq::List(l.assoc(index, value)?),
            Seq::Vector(v) => Seq::Vector(v.assoc(index, value)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conj_direction_depends_on_kind() {
        let list = Seq::List(List::of([2, 3]));
        let vector = Seq::Vector(Vector::of([2, 3]));

        assert_eq!(list.conj(Value::from(1)), Seq::List(List::of([1, 2, 3])));
        assert_eq!(
            vector.conj(Value::from(1)),
            Seq::Vector(Vector::of([2, 3, 1]))
        );
    }

    #[test]
    fn test_concat_keeps_receiver_kind() {
        let list = Seq::List(List::of([1]));
        let vector = Vector::of([2, 3]);
        assert_eq!(list.concat(&vector), Seq::List(List::of([1, 2, 3])));
    }

    #[test]
    fn test_from_value_rejects_non_sequences() {
        assert!(Seq::from_value(&Value::from(1)).is_none());
        assert!(Seq::from_value(&Value::List(List::empty())).is_some());
    }

    #[test]
    fn test_checked_index() {
        assert_eq!(checked_index(0, 1), Ok(0));
        assert!(checked_index(1, 1).is_err());
        assert!(checked_index(-1, 5).is_err());
    }
}
