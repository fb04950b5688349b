// cellvm-data - Error types for data operations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Errors raised by collection and ledger state operations.
//!
//! These are host-level failures. The execution context translates them into
//! exceptional states with the matching error code.

use crate::blob::Address;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while deriving new collections or ledger states.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// Sequence index outside `[0, length)`
    #[error("index {index} out of bounds for sequence of length {length}")]
    IndexOutOfBounds { index: i64, length: usize },
    /// Referenced account is not present in the state
    #[error("account {0} does not exist")]
    NoSuchAccount(Address),
    /// Account balance cannot cover a debit
    #[error("insufficient funds in {address}: balance {balance}, required {required}")]
    InsufficientFunds {
        address: Address,
        balance: i64,
        required: i64,
    },
    /// Negative or overflowing amount
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),
}
