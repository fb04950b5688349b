// cellvm-host - Engine implementation
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The Engine struct: transaction dispatcher and state provider.
//!
//! An [`Engine`] holds a base [`Context`] over the current ledger
//! [`State`]. Each transaction forks that base, switches it to the origin
//! account, runs it, and either commits the resulting state or discards it.
//! Queries run the same way from a second base with query limits, and never
//! commit.

use std::thread;

use cellvm_core::juice::cost;
use cellvm_core::{Context, ErrorCode, Exceptional, Op, Outcome, eval};
use cellvm_data::{Address, DataError, State, Symbol, Value};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::convert::FromValue;
use crate::response::Response;
use crate::transaction::{Transaction, TransactionKind};

/// The cellvm transaction engine.
///
/// # Thread Safety
///
/// `Engine` is `Send + Sync`. Transactions need `&mut self` because they
/// replace the current state; queries take `&self` and may run from many
/// threads at once, see [`Engine::query_all`].
///
/// # Example
///
/// ```rust
/// use cellvm_core::{CoreFn, Op};
/// use cellvm_data::{Address, State};
/// use cellvm_host::{Engine, Transaction};
///
/// let hero = Address::new(0);
/// let mut engine = Engine::new(State::genesis([1_000_000]));
/// let tx = Transaction::invoke(hero, 1, Op::def("x", Op::constant(41)));
/// engine.apply(&tx);
///
/// let inc = Op::invoke(CoreFn::Add, [Op::lookup("x"), Op::constant(1)]);
/// assert_eq!(engine.query(hero, &inc).result().as_long(), Some(42));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    base: Context,
    query_base: Context,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine over `state` with the default configuration.
    pub fn new(state: State) -> Self {
        Self::with_config(state, EngineConfig::default())
    }

    pub fn with_config(state: State, config: EngineConfig) -> Self {
        let base = Context::create(state.clone(), Address::new(0), config.limits());
        let query_base = Context::create(state, Address::new(0), config.query_limits());
        Engine {
            base,
            query_base,
            config,
        }
    }

    /// The current committed state.
    pub fn state(&self) -> &State {
        self.base.state()
    }

    fn set_state(&mut self, state: State) {
        self.base = self.base.with_state(state.clone());
        self.query_base = self.query_base.with_state(state);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply one transaction, committing its state if it succeeds.
    ///
    /// Returns the terminal context. Runtime failures are reported through
    /// that context, never as a Rust error.
    pub fn apply(&mut self, tx: &Transaction) -> Context {
        let (state, ctx) = apply_transaction(&self.base, tx);
        self.set_state(state);
        ctx
    }

    /// Apply a transaction and map the outcome to a [`Response`].
    pub fn submit(&mut self, id: u64, tx: &Transaction) -> Response {
        Response::from_context(id, &self.apply(tx))
    }

    /// Set the block timestamp, then apply `txs` in order.
    pub fn apply_block(&mut self, timestamp: i64, txs: &[Transaction]) -> Vec<Context> {
        let state = self.state().with_timestamp(timestamp);
        self.set_state(state);
        debug!(timestamp, count = txs.len(), "applying block");
        txs.iter().map(|tx| self.apply(tx)).collect()
    }

    /// Evaluate `op` as `address` without committing anything.
    pub fn query(&self, address: Address, op: &Op) -> Context {
        eval(&self.query_base.fork().with_account(address), op)
    }

    /// Evaluate independent queries on parallel threads.
    ///
    /// Results are returned in the order of `queries`.
    pub fn query_all(&self, queries: &[(Address, Op)]) -> Vec<Context> {
        thread::scope(|s| {
            let handles: Vec<_> = queries
                .iter()
                .map(|(address, op)| s.spawn(move || self.query(*address, op)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    /// Get a value defined in an account's environment.
    ///
    /// Returns `None` if the account does not exist or the symbol is not
    /// defined.
    #[must_use]
    pub fn lookup(&self, address: Address, name: &str) -> Option<Value> {
        let key = Value::Symbol(Symbol::new(name));
        self.state()
            .account(address)?
            .environment()
            .get(&key)
            .cloned()
    }

    /// Get a typed value from an account's environment.
    ///
    /// Returns `None` if the symbol is not defined or cannot be converted.
    #[must_use]
    pub fn get_as<T: FromValue>(&self, address: Address, name: &str) -> Option<T> {
        self.lookup(address, name)
            .and_then(|v| T::from_value(&v).ok())
    }
}

/// Apply `tx` against the state of `base`, returning the next state and the
/// terminal context.
///
/// The transaction runs in a fork of `base` with its limits, executing as
/// the origin account. The returned state is the base state itself (same
/// handle) unless the transaction completed normally or through `return` /
/// `halt`.
pub fn apply_transaction(base: &Context, tx: &Transaction) -> (State, Context) {
    let state = base.state();
    let ctx = base.fork().with_account(tx.origin);

    let Some(account) = state.account(tx.origin) else {
        warn!(origin = %tx.origin, "transaction from unknown account");
        let ctx = ctx.with_code(ErrorCode::Nobody, format!("no account {}", tx.origin));
        return (state.clone(), ctx);
    };
    let expected = account.sequence() + 1;
    if tx.sequence != expected {
        warn!(origin = %tx.origin, expected, got = tx.sequence, "sequence mismatch");
        let ctx = ctx.with_code(
            ErrorCode::Sequence,
            format!("expected {}, got {}", expected, tx.sequence),
        );
        return (state.clone(), ctx);
    }

    let ctx = ctx.with_sequence(tx.sequence).with_offer(tx.offer);
    let ctx = match &tx.kind {
        TransactionKind::Invoke(op) => eval(&ctx, op),
        TransactionKind::Transfer { target, amount } => {
            let ctx = ctx.consume_juice(cost::TRANSFER);
            if ctx.is_exceptional() {
                ctx
            } else {
                ctx.transfer(*target, *amount)
            }
        }
    };

    let (next, ctx) = match ctx.outcome().clone() {
        Outcome::Value(_) => commit(state, tx, &ctx),
        Outcome::Exceptional(Exceptional::Return(v) | Exceptional::Halt(v)) => {
            commit(state, tx, &ctx.with_result(v))
        }
        Outcome::Exceptional(Exceptional::Rollback(v)) => {
            (state.clone(), ctx.with_state(state.clone()).with_result(v))
        }
        Outcome::Exceptional(Exceptional::Error { .. }) => {
            (state.clone(), ctx.with_state(state.clone()))
        }
    };
    debug!(
        origin = %tx.origin,
        sequence = tx.sequence,
        juice_used = ctx.juice_used(),
        committed = !next.ptr_eq(state),
        "transaction applied"
    );
    (next, ctx)
}

/// Persist the origin's sequence and environment into the context's state.
fn commit(original: &State, tx: &Transaction, ctx: &Context) -> (State, Context) {
    let state = ctx.state();
    let updated = state.account(tx.origin).map(|acc| {
        acc.with_sequence(tx.sequence)
            .with_environment(ctx.environment().as_map().clone())
    });
    let committed = match updated {
        Some(acc) => state.with_account(tx.origin, acc),
        None => Err(DataError::NoSuchAccount(tx.origin)),
    };
    match committed {
        Ok(next) => (next.clone(), ctx.with_state(next)),
        Err(err) => {
            let ctx = ctx.with_data_error(&err).with_state(original.clone());
            (original.clone(), ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellvm_core::{CoreFn, Limits};

    const HERO: Address = Address::new(0);

    #[test]
    fn test_engine_is_send_sync() {
        fn check<T: Send + Sync>() {}
        check::<Engine>();
    }

    fn base(state: State) -> Context {
        Context::create(state, HERO, Limits::default())
    }

    #[test]
    fn test_rejected_transaction_keeps_state_handle() {
        let state = State::genesis([1000]);
        let tx = Transaction::invoke(HERO, 5, Op::constant(1));
        let (next, ctx) = apply_transaction(&base(state.clone()), &tx);
        assert!(next.ptr_eq(&state));
        assert!(ctx.is_exceptional());
        assert_eq!(ctx.juice_used(), 0);
    }

    #[test]
    fn test_commit_bumps_sequence() {
        let state = State::genesis([1000]);
        let op = Op::invoke(CoreFn::Count, [Op::constant(Value::nil())]);
        let tx = Transaction::invoke(HERO, 1, op);
        let (next, ctx) = apply_transaction(&base(state), &tx);
        assert_eq!(ctx.result(), &Value::from(0));
        assert_eq!(next.account(HERO).map(|a| a.sequence()), Some(1));
    }

    #[test]
    fn test_transaction_shares_committed_environment() {
        let mut engine = Engine::new(State::genesis([1_000_000, 1_000_000]));
        let villain = Address::new(1);
        engine.apply(&Transaction::invoke(villain, 1, Op::def("x", Op::constant(1))));
        let committed = engine.state().account(villain).unwrap().environment().clone();

        let tx = Transaction::invoke(villain, 2, Op::lookup("x"));
        let (_, ctx) = apply_transaction(&engine.base, &tx);
        assert_eq!(ctx.result(), &Value::from(1));
        assert_eq!(ctx.address(), villain);
        assert!(ctx.environment().as_map().ptr_eq(&committed));
    }

    #[test]
    fn test_query_runs_as_address_from_base() {
        let mut engine = Engine::new(State::genesis([1_000_000, 1_000_000]));
        let villain = Address::new(1);
        engine.apply(&Transaction::invoke(villain, 1, Op::def("y", Op::constant(5))));
        let ctx = engine.query(villain, &Op::lookup("y"));
        assert_eq!(ctx.result(), &Value::from(5));
        assert_eq!(ctx.origin(), villain);
        assert_eq!(ctx.juice_limit(), engine.config().query_limits().juice);
        assert!(engine.query(HERO, &Op::lookup("y")).is_exceptional());
    }
}
