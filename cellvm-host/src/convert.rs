// cellvm-host - Type conversion traits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Type conversion between Rust and cellvm values.
//!
//! This module provides the [`IntoValue`] and [`FromValue`] traits so hosts
//! can build operations and read results without matching on [`Value`].
//!
//! # Built-in Conversions
//!
//! | Rust Type | cellvm Type |
//! |-----------|-------------|
//! | `()` | `nil` |
//! | `bool` | `bool` |
//! | `i32`, `i64` | `long` |
//! | `usize` | `long` (via [`usize_to_value`], which can fail) |
//! | `String`, `&str` | `string` |
//! | `Address` | `address` |
//! | `Vec<T>` | `vector` (from vector or list) |
//! | `Option<T>` | `T` or `nil` |
//!
//! # Custom Conversions
//!
//! ```rust
//! use cellvm_data::{Value, Vector};
//! use cellvm_host::{Error, FromValue, IntoValue, Result};
//!
//! struct Point { x: i64, y: i64 }
//!
//! impl IntoValue for Point {
//!     fn into_value(self) -> Value {
//!         Value::from(Vector::of([self.x, self.y]))
//!     }
//! }
//!
//! impl FromValue for Point {
//!     fn from_value(val: &Value) -> Result<Self> {
//!         match <Vec<i64>>::from_value(val)?.as_slice() {
//!             [x, y] => Ok(Point { x: *x, y: *y }),
//!             _ => Err(Error::conversion("vector of 2 longs", val.type_name())),
//!         }
//!     }
//! }
//!
//! let p = Point::from_value(&Point { x: 1, y: 2 }.into_value()).unwrap();
//! assert_eq!((p.x, p.y), (1, 2));
//! ```

use cellvm_data::{Address, Sequence, Value, Vector};

use crate::error::{Error, Result};

/// Convert a Rust type into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Convert a [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(val: &Value) -> Result<Self>;
}

// ============================================================================
// IntoValue implementations
// ============================================================================

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Nil
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Long(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Long(i64::from(self))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl IntoValue for Address {
    fn into_value(self) -> Value {
        Value::Address(self)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Vector(self.into_iter().map(IntoValue::into_value).collect::<Vector>())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Nil,
        }
    }
}

// ============================================================================
// FromValue implementations
// ============================================================================

impl FromValue for Value {
    fn from_value(val: &Value) -> Result<Self> {
        Ok(val.clone())
    }
}

impl FromValue for () {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Nil => Ok(()),
            other => Err(Error::conversion("nil", other.type_name())),
        }
    }
}

impl FromValue for bool {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::conversion("bool", other.type_name())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_long()
            .ok_or_else(|| Error::conversion("long", val.type_name()))
    }
}

impl FromValue for i32 {
    fn from_value(val: &Value) -> Result<Self> {
        let n = i64::from_value(val)?;
        i32::try_from(n).map_err(|_| Error::OutOfRange {
            value: n,
            target: "i32",
        })
    }
}

impl FromValue for usize {
    fn from_value(val: &Value) -> Result<Self> {
        let n = i64::from_value(val)?;
        usize::try_from(n).map_err(|_| Error::OutOfRange {
            value: n,
            target: "usize",
        })
    }
}

impl FromValue for String {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::conversion("string", val.type_name()))
    }
}

impl FromValue for Address {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_address()
            .ok_or_else(|| Error::conversion("address", val.type_name()))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Vector(v) => v.iter().map(T::from_value).collect(),
            Value::List(l) => l.iter().map(T::from_value).collect(),
            other => Err(Error::conversion("vector or list", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Convert a Rust value into a [`Value`].
#[must_use]
pub fn to_value<T: IntoValue>(value: T) -> Value {
    value.into_value()
}

/// Convert a [`Value`] into a Rust type.
pub fn from_value<T: FromValue>(val: &Value) -> Result<T> {
    T::from_value(val)
}

/// Convert a count or index into a long.
///
/// Fails with [`Error::TooLarge`] above `i64::MAX` instead of clamping.
pub fn usize_to_value(n: usize) -> Result<Value> {
    i64::try_from(n).map(Value::Long).map_err(|_| Error::TooLarge {
        value: n as u64,
        target: "long",
    })
}
