// cellvm-host - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared fixtures for cellvm-host integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#[allow(unused_imports)]
pub use cellvm_core::{Address, CoreFn, ErrorCode, Exceptional, Op, State, Value};
#[allow(unused_imports)]
pub use cellvm_host::{Engine, EngineConfig, Response, Transaction};

pub const HERO: Address = Address::new(0);
pub const VILLAIN: Address = Address::new(1);

pub const HERO_BALANCE: i64 = 400_000_000;
pub const VILLAIN_BALANCE: i64 = 100_000_000;

/// An engine over [`HERO`] and [`VILLAIN`] with default configuration.
#[allow(dead_code)]
pub fn engine() -> Engine {
    Engine::new(State::genesis([HERO_BALANCE, VILLAIN_BALANCE]))
}

#[allow(dead_code)]
pub fn add(a: Op, b: Op) -> Op {
    Op::invoke(CoreFn::Add, [a, b])
}

/// Assert that a context is exceptional with the given code.
#[macro_export]
macro_rules! assert_code {
    ($ctx:expr, $code:expr) => {
        let ctx = &$ctx;
        assert!(ctx.is_exceptional(), "expected {} but got {}", $code, ctx);
        assert_eq!(
            ctx.exceptional().and_then(Exceptional::error_code),
            Some($code),
            "{}",
            ctx
        );
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
