// cellvm-core - Execution context
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The execution context: a functionally updated unit of execution.
//!
//! A [`Context`] carries everything one transaction or query needs while it
//! is being evaluated: the ledger [`State`] it reads and writes, the
//! [`Environment`] of definitions, the remaining [`Juice`], the current call
//! depth, and either a result value or an [`Exceptional`].
//!
//! Every operation takes `&self` and returns a new context. Contexts are
//! cheap handles (one `Arc`), their fields are persistent structures, so
//! creating a new one per step shares all unchanged data with its parent.
//! Operations that change nothing return a handle identical to the receiver,
//! which [`Context::ptr_eq`] can observe.
//!
//! # Lifecycle
//!
//! ```text
//! create/fork ──► Normal(result) ──with_error / consume_juice──► Exceptional
//!                     ▲   │
//!                     └───┘ with_result, define, lookup, ...
//! ```

use std::fmt;
use std::sync::Arc;

use cellvm_data::{Address, DataError, Keyword, Map, State, Symbol, Value};

use crate::env::Environment;
use crate::error::ErrorCode;
use crate::exceptional::{Exceptional, Outcome};
use crate::juice::{Juice, Limits};
use crate::special::Special;

/// A functionally updated execution context.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextData>,
}

#[derive(Clone)]
struct ContextData {
    state: State,
    environment: Environment,
    juice: Juice,
    limits: Limits,
    depth: usize,
    outcome: Outcome,
    address: Address,
    origin: Address,
    caller: Option<Address>,
    offer: i64,
    sequence: i64,
}

fn account_environment(state: &State, address: Address) -> Environment {
    state
        .account(address)
        .map(|acc| Environment::from_map(acc.environment().clone()))
        .unwrap_or_default()
}

impl Context {
    /// Create a context executing as `address` against `state`.
    ///
    /// The environment is loaded from the account's persisted definitions
    /// (empty for an unknown account). Origin is `address`, there is no
    /// caller, offer and sequence are 0, and juice is full.
    pub fn create(state: State, address: Address, limits: Limits) -> Context {
        let environment = account_environment(&state, address);
        Context {
            inner: Arc::new(ContextData {
                state,
                environment,
                juice: Juice::new(limits.juice),
                limits,
                depth: 0,
                outcome: Outcome::default(),
                address,
                origin: address,
                caller: None,
                offer: 0,
                sequence: 0,
            }),
        }
    }

    /// A fresh context for a new unit of work.
    ///
    /// The fork is normal with a nil result, depth 0 and full juice. It keeps
    /// the parent's state, environment, identity fields and limits.
    #[must_use]
    pub fn fork(&self) -> Context {
        self.update(|d| {
            d.juice = Juice::new(d.limits.juice);
            d.depth = 0;
            d.outcome = Outcome::default();
        })
    }

    fn update(&self, f: impl FnOnce(&mut ContextData)) -> Context {
        let mut data = (*self.inner).clone();
        f(&mut data);
        Context {
            inner: Arc::new(data),
        }
    }

    /// True if both handles are the same context, not merely equal ones.
    #[must_use]
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &State {
        &self.inner.state
    }

    pub fn environment(&self) -> &Environment {
        &self.inner.environment
    }

    /// Remaining juice.
    pub fn juice(&self) -> i64 {
        self.inner.juice.remaining()
    }

    pub fn juice_limit(&self) -> i64 {
        self.inner.juice.limit()
    }

    pub fn juice_used(&self) -> i64 {
        self.inner.juice.used()
    }

    pub fn limits(&self) -> Limits {
        self.inner.limits
    }

    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    pub fn address(&self) -> Address {
        self.inner.address
    }

    pub fn origin(&self) -> Address {
        self.inner.origin
    }

    pub fn caller(&self) -> Option<Address> {
        self.inner.caller
    }

    pub fn offer(&self) -> i64 {
        self.inner.offer
    }

    pub fn sequence(&self) -> i64 {
        self.inner.sequence
    }

    pub fn timestamp(&self) -> i64 {
        self.inner.state.timestamp()
    }

    pub fn balance(&self, address: Address) -> Option<i64> {
        self.inner.state.balance(address)
    }

    // ========================================================================
    // Identity builders
    // ========================================================================

    /// Execute as the account at `address`, which also becomes the origin.
    ///
    /// The environment is replaced by that account's persisted definitions
    /// and the caller is cleared. Used with [`fork`](Self::fork) to start a
    /// transaction from a shared base context.
    #[must_use]
    pub fn with_account(&self, address: Address) -> Context {
        let environment = account_environment(&self.inner.state, address);
        self.update(|d| {
            d.environment = environment;
            d.address = address;
            d.origin = address;
            d.caller = None;
        })
    }

    #[must_use]
    pub fn with_address(&self, address: Address) -> Context {
        self.update(|d| d.address = address)
    }

    #[must_use]
    pub fn with_origin(&self, origin: Address) -> Context {
        self.update(|d| d.origin = origin)
    }

    #[must_use]
    pub fn with_caller(&self, caller: Option<Address>) -> Context {
        self.update(|d| d.caller = caller)
    }

    #[must_use]
    pub fn with_offer(&self, offer: i64) -> Context {
        self.update(|d| d.offer = offer)
    }

    #[must_use]
    pub fn with_sequence(&self, sequence: i64) -> Context {
        self.update(|d| d.sequence = sequence)
    }

    #[must_use]
    pub fn with_state(&self, state: State) -> Context {
        if state.ptr_eq(&self.inner.state) {
            return self.clone();
        }
        self.update(|d| d.state = state)
    }

    #[must_use]
    pub fn with_environment(&self, environment: Environment) -> Context {
        if environment.ptr_eq(&self.inner.environment) {
            return self.clone();
        }
        self.update(|d| d.environment = environment)
    }

    #[must_use]
    pub fn with_depth(&self, depth: usize) -> Context {
        if depth == self.inner.depth {
            return self.clone();
        }
        self.update(|d| d.depth = depth)
    }

    /// Enter one level of nested evaluation.
    ///
    /// Goes exceptional with `:DEPTH` when the limit would be exceeded. The
    /// depth is left unchanged in that case, so it never exceeds the limit.
    #[must_use]
    pub fn enter_depth(&self) -> Context {
        let max = self.inner.limits.max_depth;
        if self.inner.depth >= max {
            return self.with_code(ErrorCode::Depth, format!("max depth {} exceeded", max));
        }
        self.with_depth(self.inner.depth + 1)
    }

    // ========================================================================
    // Result and exceptional state
    // ========================================================================

    pub fn is_exceptional(&self) -> bool {
        self.inner.outcome.is_exceptional()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.inner.outcome
    }

    pub fn exceptional(&self) -> Option<&Exceptional> {
        self.inner.outcome.exceptional()
    }

    /// The current result.
    ///
    /// # Panics
    ///
    /// Panics if the context is exceptional. Check
    /// [`is_exceptional`](Self::is_exceptional) or use
    /// [`outcome`](Self::outcome) when the state is not known.
    pub fn result(&self) -> &Value {
        match &self.inner.outcome {
            Outcome::Value(v) => v,
            Outcome::Exceptional(e) => {
                panic!("cannot read result of exceptional context: {}", e)
            }
        }
    }

    /// Replace the result, leaving the normal state.
    ///
    /// This also clears an exceptional outcome, as do [`lookup`] and
    /// [`transfer`] when they succeed. Evaluation code checks
    /// [`is_exceptional`](Self::is_exceptional) before calling them.
    ///
    /// [`lookup`]: Self::lookup
    /// [`transfer`]: Self::transfer
    #[must_use]
    pub fn with_result(&self, value: impl Into<Value>) -> Context {
        let value = value.into();
        self.update(|d| d.outcome = Outcome::Value(value))
    }

    /// Enter the exceptional state with an error.
    ///
    /// # Panics
    ///
    /// Panics if `code` is nil.
    #[must_use]
    pub fn with_error(&self, code: impl Into<Value>, message: impl Into<Value>) -> Context {
        self.with_exceptional(Exceptional::error(code, message))
    }

    /// Enter the exceptional state with a runtime error code.
    #[must_use]
    pub fn with_code(&self, code: ErrorCode, message: impl Into<String>) -> Context {
        self.with_exceptional(Exceptional::coded(code, message))
    }

    #[must_use]
    pub fn with_exceptional(&self, exceptional: Exceptional) -> Context {
        self.update(|d| d.outcome = Outcome::Exceptional(exceptional))
    }

    /// Set the outcome from an evaluator helper's result.
    #[must_use]
    pub fn with_outcome(&self, outcome: impl Into<Outcome>) -> Context {
        let outcome = outcome.into();
        self.update(|d| d.outcome = outcome)
    }

    // ========================================================================
    // Juice
    // ========================================================================

    /// True if `amount` juice is available. Never changes the context.
    pub fn check_juice(&self, amount: i64) -> bool {
        self.inner.juice.check(amount)
    }

    /// Charge `amount` juice.
    ///
    /// If less than `amount` remains, juice drops to zero and the context
    /// goes exceptional with `:JUICE` (unless it already was exceptional).
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative.
    #[must_use]
    pub fn consume_juice(&self, amount: i64) -> Context {
        match self.inner.juice.consume(amount) {
            Ok(juice) => self.update(|d| d.juice = juice),
            Err(exhausted) => {
                let ctx = self.update(|d| d.juice = exhausted);
                if ctx.is_exceptional() {
                    ctx
                } else {
                    ctx.with_code(
                        ErrorCode::Juice,
                        format!("out of juice: needed {}, had {}", amount, self.juice()),
                    )
                }
            }
        }
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    /// Bind `sym` to `value` in the environment. The outcome is unchanged,
    /// so an exceptional context stays exceptional.
    #[must_use]
    pub fn define(&self, sym: Symbol, value: impl Into<Value>) -> Context {
        let environment = self.inner.environment.define(sym, value.into());
        self.with_environment(environment)
    }

    /// Remove the binding of `sym`. Returns this very context when `sym` is
    /// unbound.
    #[must_use]
    pub fn undefine(&self, sym: &Symbol) -> Context {
        let environment = self.inner.environment.undefine(sym);
        self.with_environment(environment)
    }

    /// Resolve `sym` into the result.
    ///
    /// Special variables are tried first, then the environment. Anything else
    /// goes exceptional with `:UNDECLARED`, naming the symbol. A successful
    /// lookup replaces any exceptional outcome.
    #[must_use]
    pub fn lookup(&self, sym: &Symbol) -> Context {
        if let Some(ctx) = self.compute_special(sym) {
            return ctx;
        }
        match self.inner.environment.lookup(sym) {
            Some(value) => self.with_result(value.clone()),
            None => self.with_code(ErrorCode::Undeclared, sym.name()),
        }
    }

    /// Resolve `sym` as a special variable.
    ///
    /// Returns `None` when `sym` is not a special variable name, otherwise a
    /// context whose result is the special's value (which may be nil).
    pub fn compute_special(&self, sym: &Symbol) -> Option<Context> {
        let special = Special::from_symbol(sym)?;
        Some(self.with_result(special.resolve(self)))
    }

    // ========================================================================
    // Ledger
    // ========================================================================

    /// Transfer `amount` from the current address to `target`.
    ///
    /// On success the result is the amount transferred. Failures go
    /// exceptional with `:FUNDS`, `:NOBODY` or `:ARGUMENT` and leave the
    /// state untouched. A success replaces any exceptional outcome.
    #[must_use]
    pub fn transfer(&self, target: Address, amount: i64) -> Context {
        match self.inner.state.transfer(self.inner.address, target, amount) {
            Ok(state) => self.with_state(state).with_result(amount),
            Err(err) => self.with_data_error(&err),
        }
    }

    /// Set the holding the current address keeps for `owner`.
    ///
    /// A nil `value` removes the holding. The result is `value`. Fails with
    /// `:NOBODY` when the current address has no account.
    #[must_use]
    pub fn set_holding(&self, owner: Address, value: Value) -> Context {
        let updated = self.inner.state.with_holding(self.inner.address, owner, value.clone());
        match updated {
            Ok(state) => self.with_state(state).with_result(value),
            Err(err) => self.with_data_error(&err),
        }
    }

    /// Go exceptional with the code matching a data-layer failure.
    #[must_use]
    pub fn with_data_error(&self, err: &DataError) -> Context {
        self.with_exceptional(Exceptional::from(err))
    }

    // ========================================================================
    // Printing
    // ========================================================================

    /// The context as a map value, for structured debugging output.
    pub fn to_map(&self) -> Map {
        let d = &*self.inner;
        let kw = |name: &str| Value::Keyword(Keyword::new(name));
        let mut map = Map::of([
            (kw("address"), Value::from(d.address)),
            (kw("origin"), Value::from(d.origin)),
            (kw("caller"), Value::from(d.caller)),
            (kw("juice"), Value::from(d.juice.remaining())),
            (kw("juice-limit"), Value::from(d.juice.limit())),
            (kw("depth"), Value::from(d.depth as i64)),
            (kw("offer"), Value::from(d.offer)),
            (kw("sequence"), Value::from(d.sequence)),
            (kw("timestamp"), Value::from(d.state.timestamp())),
            (kw("environment"), Value::from(d.environment.as_map().clone())),
            (kw("state-hash"), Value::from(d.state.content_hash().to_string())),
        ]);
        map = match &d.outcome {
            Outcome::Value(v) => map.assoc(kw("result"), v.clone()),
            Outcome::Exceptional(e) => map.assoc(
                kw("exceptional"),
                Value::from(Map::of([
                    (kw("code"), e.code()),
                    (kw("message"), e.message().clone()),
                ])),
            ),
        };
        map
    }

    /// EDN rendering of [`to_map`](Self::to_map).
    pub fn edn_string(&self) -> String {
        self.to_map().to_string()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_map())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context{}", self.to_map())
    }
}
