// cellvm-data - Ledger state
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The ledger [`State`]: every account's status plus the block timestamp.
//!
//! A `State` is never mutated. Each transition (`with_account`, `transfer`,
//! ...) returns a new `State` sharing every untouched account with the old
//! one, so the previous state remains valid and can be reinstated on
//! rollback simply by keeping the old handle.

use std::fmt;
use std::sync::Arc;

use crate::blob::Address;
use crate::blob_map::BlobMap;
use crate::error::{DataError, Result};
use crate::map::Map;
use crate::value::Value;

/// Status of a single account.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountStatus {
    balance: i64,
    sequence: i64,
    environment: Map,
    holdings: BlobMap,
}

impl AccountStatus {
    /// A fresh account with `balance`, sequence 0 and no bindings.
    #[must_use]
    pub fn new(balance: i64) -> Self {
        AccountStatus {
            balance,
            sequence: 0,
            environment: Map::empty(),
            holdings: BlobMap::empty(),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Sequence number of the last transaction applied for this account.
    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    /// Persistent bindings (symbol -> value) of this account.
    pub fn environment(&self) -> &Map {
        &self.environment
    }

    pub fn holdings(&self) -> &BlobMap {
        &self.holdings
    }

    #[must_use]
    pub fn with_balance(&self, balance: i64) -> Self {
        AccountStatus {
            balance,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_sequence(&self, sequence: i64) -> Self {
        AccountStatus {
            sequence,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_environment(&self, environment: Map) -> Self {
        AccountStatus {
            environment,
            ..self.clone()
        }
    }

    /// Set the holding this account keeps for `owner`. A nil value removes it.
    #[must_use]
    pub fn with_holding(&self, owner: Address, value: Value) -> Self {
        let key = owner.to_blob();
        let holdings = if value.is_nil() {
            self.holdings.dissoc(key.as_bytes())
        } else {
            self.holdings.assoc(key, value)
        };
        AccountStatus {
            holdings,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct StateData {
    timestamp: i64,
    accounts: im::Vector<AccountStatus>,
}

/// An immutable snapshot of the ledger.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    inner: Arc<StateData>,
}

impl State {
    /// Build a state from account statuses; account `i` gets address `#i`.
    pub fn new<I>(accounts: I, timestamp: i64) -> State
    where
        I: IntoIterator<Item = AccountStatus>,
    {
        State {
            inner: Arc::new(StateData {
                timestamp,
                accounts: accounts.into_iter().collect(),
            }),
        }
    }

    /// A state at timestamp 0 with one fresh account per balance.
    pub fn genesis<I>(balances: I) -> State
    where
        I: IntoIterator<Item = i64>,
    {
        State::new(balances.into_iter().map(AccountStatus::new), 0)
    }

    pub fn timestamp(&self) -> i64 {
        self.inner.timestamp
    }

    pub fn account_count(&self) -> usize {
        self.inner.accounts.len()
    }

    #[must_use]
    pub fn account(&self, address: Address) -> Option<&AccountStatus> {
        self.inner.accounts.get(address.index()?)
    }

    /// Iterate `(address, status)` pairs in address order.
    pub fn accounts(&self) -> impl Iterator<Item = (Address, &AccountStatus)> {
        self.inner
            .accounts
            .iter()
            .enumerate()
            .map(|(i, acc)| (Address::new(i as u64), acc))
    }

    #[must_use]
    pub fn balance(&self, address: Address) -> Option<i64> {
        self.account(address).map(AccountStatus::balance)
    }

    /// Replace the status of an existing account.
    pub fn with_account(&self, address: Address, status: AccountStatus) -> Result<State> {
        let index = address
            .index()
            .filter(|&i| i < self.inner.accounts.len())
            .ok_or(DataError::NoSuchAccount(address))?;
        Ok(State {
            inner: Arc::new(StateData {
                timestamp: self.inner.timestamp,
                accounts: self.inner.accounts.update(index, status),
            }),
        })
    }

    /// Set the holding `address` keeps for `owner`. A nil value removes it.
    pub fn with_holding(&self, address: Address, owner: Address, value: Value) -> Result<State> {
        let status = self
            .account(address)
            .ok_or(DataError::NoSuchAccount(address))?
            .with_holding(owner, value);
        self.with_account(address, status)
    }

    pub fn with_balance(&self, address: Address, balance: i64) -> Result<State> {
        let status = self
            .account(address)
            .ok_or(DataError::NoSuchAccount(address))?
            .with_balance(balance);
        self.with_account(address, status)
    }

    #[must_use]
    pub fn with_timestamp(&self, timestamp: i64) -> State {
        if timestamp == self.inner.timestamp {
            return self.clone();
        }
        State {
            inner: Arc::new(StateData {
                timestamp,
                accounts: self.inner.accounts.clone(),
            }),
        }
    }

    /// Move `amount` from `source` to `target`.
    ///
    /// Fails without producing a new state when either account is missing,
    /// `amount` is negative, or `source` cannot cover it.
    pub fn transfer(&self, source: Address, target: Address, amount: i64) -> Result<State> {
        if amount < 0 {
            return Err(DataError::InvalidAmount(amount));
        }
        let from = self
            .account(source)
            .ok_or(DataError::NoSuchAccount(source))?;
        let to = self
            .account(target)
            .ok_or(DataError::NoSuchAccount(target))?;
        if from.balance < amount {
            return Err(DataError::InsufficientFunds {
                address: source,
                balance: from.balance,
                required: amount,
            });
        }
        if source == target {
            return Ok(self.clone());
        }
        let credited = to
            .balance
            .checked_add(amount)
            .ok_or(DataError::InvalidAmount(amount))?;
        let from = from.with_balance(from.balance - amount);
        let to = to.with_balance(credited);
        self.with_account(source, from)?.with_account(target, to)
    }

    /// Sum of all account balances.
    pub fn total_funds(&self) -> i128 {
        self.inner
            .accounts
            .iter()
            .map(|acc| i128::from(acc.balance))
            .sum()
    }

    /// True if both handles refer to the same snapshot.
    #[must_use]
    pub fn ptr_eq(&self, other: &State) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#state {{:timestamp {}, :accounts [", self.inner.timestamp)?;
        for (i, acc) in self.inner.accounts.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(
                f,
                "{{:balance {}, :sequence {}}}",
                acc.balance, acc.sequence
            )?;
        }
        write!(f, "]}}")
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
