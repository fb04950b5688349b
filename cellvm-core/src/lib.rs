// cellvm-core - Execution context and reference evaluator for cellvm
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # cellvm-core
//!
//! The execution core of cellvm.
//! Provides the functionally updated [`Context`] with juice accounting,
//! environment scoping, special-variable resolution and the exceptional
//! channel, plus a small reference evaluator ([`ops`]) that drives it.
//!
//! Contexts are immutable and `Send + Sync`. Independent contexts forked
//! from the same state can run on different threads without locking.

pub mod context;
pub mod env;
pub mod error;
pub mod exceptional;
pub mod juice;
pub mod ops;
pub mod special;

pub use context::Context;
pub use env::Environment;
pub use error::ErrorCode;
pub use exceptional::{Exceptional, Outcome, Result};
pub use juice::{Juice, Limits};
pub use ops::{CoreFn, Op, eval};
pub use special::Special;

// Re-export data types for convenience
pub use cellvm_data::{Address, State, Symbol, Value};
