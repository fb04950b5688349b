// cellvm-core - Special variables
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Runtime-reflective special variables such as `*address*` and `*juice*`.
//!
//! Special variables are not bindings. They are computed from the context
//! and its ledger state each time they are resolved, and they take
//! precedence over any environment binding of the same name.

use cellvm_data::{BlobMap, Symbol, Value};

use crate::context::Context;

/// The fixed set of special variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    Address,
    Origin,
    Caller,
    Result,
    Juice,
    Depth,
    Balance,
    Offer,
    Sequence,
    Timestamp,
    State,
    Holdings,
}

impl Special {
    pub const ALL: [Special; 12] = [
        Special::Address,
        Special::Origin,
        Special::Caller,
        Special::Result,
        Special::Juice,
        Special::Depth,
        Special::Balance,
        Special::Offer,
        Special::Sequence,
        Special::Timestamp,
        Special::State,
        Special::Holdings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Special::Address => "*address*",
            Special::Origin => "*origin*",
            Special::Caller => "*caller*",
            Special::Result => "*result*",
            Special::Juice => "*juice*",
            Special::Depth => "*depth*",
            Special::Balance => "*balance*",
            Special::Offer => "*offer*",
            Special::Sequence => "*sequence*",
            Special::Timestamp => "*timestamp*",
            Special::State => "*state*",
            Special::Holdings => "*holdings*",
        }
    }

    pub fn symbol(self) -> Symbol {
        Symbol::new(self.name())
    }

    /// The special variable named by `sym`, if any.
    pub fn from_symbol(sym: &Symbol) -> Option<Special> {
        if !sym.is_starred() {
            return None;
        }
        Special::ALL.into_iter().find(|s| s.name() == sym.name())
    }

    /// Compute the current value of this special variable in `ctx`.
    ///
    /// Values that are absent (no caller, unknown account) resolve to nil.
    /// `*state*` is the context's own state handle and `*holdings*` falls
    /// back to the canonical empty blob-map, so both are identity-preserving.
    pub fn resolve(self, ctx: &Context) -> Value {
        match self {
            Special::Address => ctx.address().into(),
            Special::Origin => ctx.origin().into(),
            Special::Caller => ctx.caller().into(),
            Special::Result => ctx.outcome().value().cloned().unwrap_or_default(),
            Special::Juice => ctx.juice().into(),
            Special::Depth => Value::from(ctx.depth() as i64),
            Special::Balance => ctx.balance(ctx.address()).into(),
            Special::Offer => ctx.offer().into(),
            Special::Sequence => ctx.sequence().into(),
            Special::Timestamp => ctx.state().timestamp().into(),
            Special::State => Value::State(ctx.state().clone()),
            Special::Holdings => Value::BlobMap(
                ctx.state()
                    .account(ctx.address())
                    .map(|acc| acc.holdings().clone())
                    .unwrap_or_else(BlobMap::empty),
            ),
        }
    }
}
