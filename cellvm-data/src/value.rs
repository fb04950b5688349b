// cellvm-data - Value type
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type for cellvm.
//!
//! `Value` is the central enum representing every datum that can flow through
//! an execution context: bindings, results, error payloads and ledger state.
//! All variants are immutable and cheap to clone; collections share structure.
//!
//! Equality, ordering and hashing are structural. Two values that compare
//! equal also have the same [`content_hash`](Value::content_hash).

use std::fmt;
use std::sync::Arc;

use crate::blob::{Address, Blob};
use crate::blob_map::BlobMap;
use crate::keyword::Keyword;
use crate::list::List;
use crate::map::Map;
use crate::set::Set;
use crate::state::State;
use crate::symbol::Symbol;
use crate::vector::Vector;

/// Any cellvm value.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// The nil value, representing nothing/absence
    #[default]
    Nil,
    Bool(bool),
    /// 64-bit signed integer
    Long(i64),
    String(Arc<str>),
    Blob(Blob),
    Address(Address),
    Symbol(Symbol),
    Keyword(Keyword),
    List(List),
    Vector(Vector),
    Map(Map),
    Set(Set),
    BlobMap(BlobMap),
    /// A whole ledger state, e.g. the result of `*state*`
    State(State),
}

impl Value {
    pub fn nil() -> Self {
        Value::Nil
    }

    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn long(n: i64) -> Self {
        Value::Long(n)
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    pub fn keyword(name: &str) -> Self {
        Value::Keyword(Keyword::new(name))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Check if this value is truthy (not nil and not false)
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Value::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Long(_) => "long",
            Value::String(_) => "string",
            Value::Blob(_) => "blob",
            Value::Address(_) => "address",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::BlobMap(_) => "blob-map",
            Value::State(_) => "state",
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Long(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

macro_rules! impl_from_variant {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$ty(v)
                }
            }
        )*
    };
}

impl_from_variant!(Blob, Address, Symbol, Keyword, List, Vector, Map, Set, BlobMap, State);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

// ============================================================================
// Printing
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Long(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Blob(b) => write!(f, "{}", b),
            Value::Address(a) => write!(f, "{}", a),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Keyword(k) => write!(f, "{}", k),
            Value::List(l) => write!(f, "{}", l),
            Value::Vector(v) => write!(f, "{}", v),
            Value::Map(m) => write!(f, "{}", m),
            Value::Set(s) => write!(f, "{}", s),
            Value::BlobMap(m) => write!(f, "{}", m),
            Value::State(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
