// cellvm-core - Juice accounting and execution limits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Juice: the metered resource budget of a context.
//!
//! Every evaluation step is charged before it runs. Juice only ever goes
//! down; a charge larger than what remains empties the counter and the
//! context goes exceptional with `:JUICE`. Because costs are fixed constants
//! and charging is deterministic, every node consumes exactly the same
//! amount for the same transaction.

/// Juice costs charged by the reference evaluator.
pub mod cost {
    /// Evaluating a constant
    pub const CONSTANT: i64 = 5;
    /// Resolving a symbol
    pub const LOOKUP: i64 = 15;
    /// Creating or removing a definition
    pub const DEF: i64 = 100;
    /// Sequencing a block of operations
    pub const DO: i64 = 10;
    /// Evaluating a conditional
    pub const COND: i64 = 20;
    /// Invoking a core function
    pub const INVOKE: i64 = 30;
    /// Each element of a built collection
    pub const BUILD_PER_ELEMENT: i64 = 10;
    /// Moving funds between accounts
    pub const TRANSFER: i64 = 100;
    /// Reading a balance
    pub const BALANCE: i64 = 50;
    /// Writing a holding
    pub const SET_HOLDING: i64 = 100;
}

/// Execution limits applied to a context and everything forked from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Juice available to each fork.
    pub juice: i64,
    /// Maximum nested evaluation depth.
    pub max_depth: usize,
}

impl Limits {
    pub const DEFAULT_JUICE: i64 = 1_000_000;
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    #[must_use]
    pub fn with_juice(self, juice: i64) -> Self {
        Limits { juice, ..self }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            juice: Self::DEFAULT_JUICE,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// A bounded, non-refundable counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Juice {
    limit: i64,
    remaining: i64,
}

impl Juice {
    /// A full counter. Negative limits are treated as zero.
    pub fn new(limit: i64) -> Self {
        let limit = limit.max(0);
        Juice {
            limit,
            remaining: limit,
        }
    }

    pub fn limit(self) -> i64 {
        self.limit
    }

    pub fn remaining(self) -> i64 {
        self.remaining
    }

    /// Juice consumed so far.
    pub fn used(self) -> i64 {
        self.limit - self.remaining
    }

    /// True if `amount` can be charged without exhausting the counter.
    pub fn check(self, amount: i64) -> bool {
        self.remaining >= amount
    }

    /// Charge `amount`.
    ///
    /// Returns the decremented counter, or `Err` holding an emptied counter
    /// when `amount` exceeds what remains. Charging exactly what remains is
    /// legal and leaves zero.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative; juice is never refunded.
    pub fn consume(self, amount: i64) -> Result<Juice, Juice> {
        assert!(amount >= 0, "juice charge must not be negative: {}", amount);
        if self.remaining >= amount {
            Ok(Juice {
                remaining: self.remaining - amount,
                ..self
            })
        } else {
            Err(Juice {
                remaining: 0,
                ..self
            })
        }
    }
}
