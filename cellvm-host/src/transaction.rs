// cellvm-host - Transactions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Transactions submitted to an [`Engine`](crate::Engine).

use cellvm_core::Op;
use cellvm_data::Address;

/// A signed-off unit of work from one origin account.
///
/// `sequence` must be exactly one more than the origin account's last
/// applied sequence number, otherwise the transaction is rejected without
/// executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub origin: Address,
    pub sequence: i64,
    /// Funds offered to the code being executed, visible as `*offer*`
    pub offer: i64,
    pub kind: TransactionKind,
}

/// What a transaction does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    /// Evaluate an operation as the origin account
    Invoke(Op),
    /// Move funds from the origin to `target`
    Transfer { target: Address, amount: i64 },
}

impl Transaction {
    pub fn invoke(origin: Address, sequence: i64, op: Op) -> Self {
        Transaction {
            origin,
            sequence,
            offer: 0,
            kind: TransactionKind::Invoke(op),
        }
    }

    pub fn transfer(origin: Address, sequence: i64, target: Address, amount: i64) -> Self {
        Transaction {
            origin,
            sequence,
            offer: 0,
            kind: TransactionKind::Transfer { target, amount },
        }
    }

    #[must_use]
    pub fn with_offer(self, offer: i64) -> Self {
        Transaction { offer, ..self }
    }
}
