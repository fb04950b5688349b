// cellvm-data - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for cellvm-data integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#[allow(unused_imports)]
pub use cellvm_data::{
    Address, Blob, BlobMap, Keyword, List, Map, Seq, Sequence, Set, State, Symbol, Value, Vector,
};

/// Shorthand for a keyword value.
#[allow(dead_code)]
pub fn kw(name: &str) -> Value {
    Value::Keyword(Keyword::new(name))
}

/// Shorthand for a symbol value.
#[allow(dead_code)]
pub fn sym(name: &str) -> Value {
    Value::Symbol(Symbol::new(name))
}

/// Collect the longs of a sequence, panicking on any other element.
#[allow(dead_code)]
pub fn longs<S: Sequence>(seq: &S) -> Vec<i64> {
    seq.iter()
        .map(|v| v.as_long().expect("sequence element should be a long"))
        .collect()
}

/// Assert that a sequence holds exactly the given longs, in order.
#[macro_export]
macro_rules! assert_longs {
    ($seq:expr, [$($n:expr),* $(,)?]) => {
        assert_eq!(
            $crate::common::longs(&$seq),
            vec![$($n as i64),*],
            "sequence contents mismatch"
        )
    };
}
