// cellvm-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared fixtures for cellvm-core integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Fixtures
//!
//! - [`HERO`] / [`VILLAIN`] - the two funded accounts of [`initial_state`]
//! - [`initial_context`] - a context executing as [`HERO`]
//!
//! # Macros
//!
//! - [`assert_code!`] - Assert that a context is exceptional with a given code
//! - [`assert_result!`] - Assert that a context is normal with a given result

#[allow(unused_imports)]
pub use cellvm_core::{
    Address, Context, CoreFn, Environment, ErrorCode, Exceptional, Limits, Op, State, Symbol,
    Value, eval,
};

pub const HERO: Address = Address::new(0);
pub const VILLAIN: Address = Address::new(1);

pub const HERO_BALANCE: i64 = 400_000_000;
pub const VILLAIN_BALANCE: i64 = 100_000_000;

pub const INITIAL_TIMESTAMP: i64 = 1_600_000_000_000;

/// Ledger state with [`HERO`] and [`VILLAIN`] funded.
#[allow(dead_code)]
pub fn initial_state() -> State {
    State::genesis([HERO_BALANCE, VILLAIN_BALANCE]).with_timestamp(INITIAL_TIMESTAMP)
}

/// A context executing as [`HERO`] with default limits.
#[allow(dead_code)]
pub fn initial_context() -> Context {
    Context::create(initial_state(), HERO, Limits::default())
}

#[allow(dead_code)]
pub fn sym(name: &str) -> Symbol {
    Symbol::new(name)
}

/// The runtime error code of an exceptional context.
#[allow(dead_code)]
pub fn code_of(ctx: &Context) -> Option<ErrorCode> {
    ctx.exceptional().and_then(Exceptional::error_code)
}

/// Assert that a context is exceptional with the given code.
#[macro_export]
macro_rules! assert_code {
    ($ctx:expr, $code:expr) => {
        let ctx = &$ctx;
        assert!(ctx.is_exceptional(), "expected {} but got {}", $code, ctx);
        assert_eq!($crate::common::code_of(ctx), Some($code), "{}", ctx);
    };
}

/// Assert that a context is normal with the given result.
#[macro_export]
macro_rules! assert_result {
    ($ctx:expr, $expected:expr) => {
        let ctx = &$ctx;
        assert!(!ctx.is_exceptional(), "unexpected exceptional: {}", ctx);
        assert_eq!(ctx.result(), &Value::from($expected));
    };
}
