// cellvm-host - Transaction dispatch, responses and configuration for cellvm
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # cellvm-host
//!
//! The host-facing API of cellvm.
//!
//! This crate owns the ledger state between transactions. It validates and
//! dispatches [`Transaction`]s, commits or discards the state each one
//! produces, runs read-only queries, and maps terminal contexts to
//! [`Response`]s for the wire.
//!
//! ## Quick Start
//!
//! ```rust
//! use cellvm_data::{Address, State};
//! use cellvm_host::{Engine, Transaction};
//!
//! let (hero, villain) = (Address::new(0), Address::new(1));
//! let mut engine = Engine::new(State::genesis([1_000, 0]));
//!
//! let response = engine.submit(1, &Transaction::transfer(hero, 1, villain, 250));
//! assert_eq!(response.value().and_then(|v| v.as_long()), Some(250));
//! assert_eq!(engine.state().balance(villain), Some(250));
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use cellvm_data::State;
//! use cellvm_host::{Engine, EngineConfig};
//!
//! let config = EngineConfig::from_toml_str("juice_limit = 5000").unwrap();
//! let engine = Engine::with_config(State::genesis([0]), config);
//! assert_eq!(engine.config().limits().juice, 5000);
//! ```

mod config;
mod convert;
mod engine;
mod error;
mod response;
mod transaction;

pub use config::EngineConfig;
pub use convert::{FromValue, IntoValue, from_value, to_value, usize_to_value};
pub use engine::{Engine, apply_transaction};
pub use error::{Error, Result};
pub use response::{Response, ResponseBody};
pub use transaction::{Transaction, TransactionKind};
