// cellvm-core - Reference evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A minimal operation tree and its evaluator.
//!
//! [`Op`] is not a language. It is the smallest set of operations that
//! drives every part of the context contract: constants, symbol lookup,
//! definitions, sequencing, conditionals and a handful of core functions.
//!
//! Every step is charged before it runs, nested operations are evaluated one
//! level deeper (failing with `:DEPTH` past the limit), and evaluation stops
//! at the first exceptional state, which is returned unchanged.

use std::fmt;

use cellvm_data::{Address, List, Map, Seq, Sequence, Symbol, Value};
use tracing::trace;

use crate::context::Context;
use crate::error::ErrorCode;
use crate::exceptional::{Exceptional, Result};
use crate::juice::cost;

/// An operation to evaluate against a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Produce a value as-is
    Constant(Value),
    /// Resolve a symbol (special variables first)
    Lookup(Symbol),
    /// Evaluate the body and bind the symbol to its value
    Def(Symbol, Box<Op>),
    /// Remove a binding
    Undef(Symbol),
    /// Evaluate in order, producing the last result (nil when empty)
    Do(Vec<Op>),
    /// Test/expression pairs, with an optional trailing default
    Cond(Vec<Op>),
    /// Evaluate arguments left to right, then apply a core function
    Invoke(CoreFn, Vec<Op>),
}

impl Op {
    pub fn constant(value: impl Into<Value>) -> Op {
        Op::Constant(value.into())
    }

    pub fn lookup(name: &str) -> Op {
        Op::Lookup(Symbol::new(name))
    }

    pub fn def(name: &str, body: Op) -> Op {
        Op::Def(Symbol::new(name), Box::new(body))
    }

    pub fn undef(name: &str) -> Op {
        Op::Undef(Symbol::new(name))
    }

    pub fn invoke(f: CoreFn, args: impl IntoIterator<Item = Op>) -> Op {
        Op::Invoke(f, args.into_iter().collect())
    }

    /// Juice charged for this operation itself, before any children.
    pub fn cost(&self) -> i64 {
        match self {
            Op::Constant(_) => cost::CONSTANT,
            Op::Lookup(_) => cost::LOOKUP,
            Op::Def(..) | Op::Undef(_) => cost::DEF,
            Op::Do(_) => cost::DO,
            Op::Cond(_) => cost::COND,
            Op::Invoke(..) => cost::INVOKE,
        }
    }
}

fn write_all(f: &mut fmt::Formatter<'_>, ops: &[Op]) -> fmt::Result {
    for op in ops {
        write!(f, " {}", op)?;
    }
    Ok(())
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Constant(v) => write!(f, "{}", v),
            Op::Lookup(s) => write!(f, "{}", s),
            Op::Def(s, body) => write!(f, "(def {} {})", s, body),
            Op::Undef(s) => write!(f, "(undef {})", s),
            Op::Do(ops) => {
                write!(f, "(do")?;
                write_all(f, ops)?;
                write!(f, ")")
            }
            Op::Cond(ops) => {
                write!(f, "(cond")?;
                write_all(f, ops)?;
                write!(f, ")")
            }
            Op::Invoke(func, args) => {
                write!(f, "({}", func.name())?;
                write_all(f, args)?;
                write!(f, ")")
            }
        }
    }
}

/// Core functions available to [`Op::Invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreFn {
    Vector,
    List,
    Conj,
    Assoc,
    Count,
    Add,
    Sub,
    Eq,
    Assert,
    Fail,
    Return,
    Rollback,
    Halt,
    Transfer,
    Balance,
    SetHolding,
}

impl CoreFn {
    pub const ALL: [CoreFn; 16] = [
        CoreFn::Vector,
        CoreFn::List,
        CoreFn::Conj,
        CoreFn::Assoc,
        CoreFn::Count,
        CoreFn::Add,
        CoreFn::Sub,
        CoreFn::Eq,
        CoreFn::Assert,
        CoreFn::Fail,
        CoreFn::Return,
        CoreFn::Rollback,
        CoreFn::Halt,
        CoreFn::Transfer,
        CoreFn::Balance,
        CoreFn::SetHolding,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoreFn::Vector => "vector",
            CoreFn::List => "list",
            CoreFn::Conj => "conj",
            CoreFn::Assoc => "assoc",
            CoreFn::Count => "count",
            CoreFn::Add => "+",
            CoreFn::Sub => "-",
            CoreFn::Eq => "=",
            CoreFn::Assert => "assert",
            CoreFn::Fail => "fail",
            CoreFn::Return => "return",
            CoreFn::Rollback => "rollback",
            CoreFn::Halt => "halt",
            CoreFn::Transfer => "transfer",
            CoreFn::Balance => "balance",
            CoreFn::SetHolding => "set-holding",
        }
    }

    pub fn from_name(name: &str) -> Option<CoreFn> {
        CoreFn::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Juice charged when applying to `argc` evaluated arguments.
    fn apply_cost(self, argc: usize) -> i64 {
        let per_element = cost::BUILD_PER_ELEMENT.saturating_mul(argc as i64);
        match self {
            CoreFn::Vector | CoreFn::List | CoreFn::Conj | CoreFn::Assoc => per_element,
            CoreFn::Transfer => cost::TRANSFER,
            CoreFn::Balance => cost::BALANCE,
            CoreFn::SetHolding => cost::SET_HOLDING,
            _ => 0,
        }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate `op` in `ctx`.
///
/// An exceptional `ctx` is returned as-is without charging anything.
pub fn eval(ctx: &Context, op: &Op) -> Context {
    if ctx.is_exceptional() {
        return ctx.clone();
    }
    let ctx = ctx.consume_juice(op.cost());
    if ctx.is_exceptional() {
        trace!(op = %op, "juice exhausted");
        return ctx;
    }
    let out = match op {
        Op::Constant(v) => ctx.with_result(v.clone()),
        Op::Lookup(sym) => ctx.lookup(sym),
        Op::Def(sym, body) => eval_def(&ctx, sym, body),
        Op::Undef(sym) => ctx.undefine(sym).with_result(Value::Nil),
        Op::Do(ops) => eval_do(&ctx, ops),
        Op::Cond(ops) => eval_cond(&ctx, ops),
        Op::Invoke(f, args) => eval_invoke(&ctx, *f, args),
    };
    if let Some(e) = out.exceptional() {
        trace!(op = %op, code = %e.code(), depth = out.depth(), "exceptional");
    }
    out
}

/// Evaluate `op` one level deeper, restoring the caller's depth afterwards.
fn eval_nested(ctx: &Context, op: &Op) -> Context {
    let inner = ctx.enter_depth();
    if inner.is_exceptional() {
        return inner;
    }
    eval(&inner, op).with_depth(ctx.depth())
}

fn eval_def(ctx: &Context, sym: &Symbol, body: &Op) -> Context {
    let ctx = eval_nested(ctx, body);
    if ctx.is_exceptional() {
        return ctx;
    }
    let value = ctx.result().clone();
    ctx.define(sym.clone(), value.clone()).with_result(value)
}

fn eval_do(ctx: &Context, ops: &[Op]) -> Context {
    let mut ctx = ctx.with_result(Value::Nil);
    for op in ops {
        ctx = eval_nested(&ctx, op);
        if ctx.is_exceptional() {
            break;
        }
    }
    ctx
}

fn eval_cond(ctx: &Context, ops: &[Op]) -> Context {
    let mut pairs = ops.chunks_exact(2);
    let mut ctx = ctx.clone();
    for pair in pairs.by_ref() {
        ctx = eval_nested(&ctx, &pair[0]);
        if ctx.is_exceptional() {
            return ctx;
        }
        if ctx.result().is_truthy() {
            return eval_nested(&ctx, &pair[1]);
        }
    }
    match pairs.remainder() {
        [default] => eval_nested(&ctx, default),
        _ => ctx.with_result(Value::Nil),
    }
}

fn eval_invoke(ctx: &Context, f: CoreFn, arg_ops: &[Op]) -> Context {
    let mut ctx = ctx.clone();
    let mut args = Vec::with_capacity(arg_ops.len());
    for op in arg_ops {
        ctx = eval_nested(&ctx, op);
        if ctx.is_exceptional() {
            return ctx;
        }
        args.push(ctx.result().clone());
    }
    let ctx = ctx.consume_juice(f.apply_cost(args.len()));
    if ctx.is_exceptional() {
        return ctx;
    }
    apply(&ctx, f, &args)
}

/// Apply a core function to evaluated arguments.
pub fn apply(ctx: &Context, f: CoreFn, args: &[Value]) -> Context {
    match f {
        CoreFn::Transfer => match transfer_args(args) {
            Ok((target, amount)) => ctx.transfer(target, amount),
            Err(e) => ctx.with_exceptional(e),
        },
        CoreFn::Balance => match balance_target(ctx, args) {
            Ok(address) => ctx.with_result(ctx.balance(address)),
            Err(e) => ctx.with_exceptional(e),
        },
        CoreFn::SetHolding => match holding_args(args) {
            Ok((owner, value)) => ctx.set_holding(owner, value),
            Err(e) => ctx.with_exceptional(e),
        },
        _ => ctx.with_outcome(apply_pure(f, args)),
    }
}

fn apply_pure(f: CoreFn, args: &[Value]) -> Result<Value> {
    match f {
        CoreFn::Vector => Ok(Value::Vector(args.iter().cloned().collect())),
        CoreFn::List => Ok(Value::List(args.iter().cloned().collect())),
        CoreFn::Conj => {
            check_arity(f, args, 1, None)?;
            args[1..]
                .iter()
                .try_fold(args[0].clone(), |coll, x| conj(coll, x.clone()))
        }
        CoreFn::Assoc => {
            check_arity(f, args, 3, None)?;
            if args.len() % 2 == 0 {
                return Err(arity_error(f, args.len()));
            }
            args[1..]
                .chunks_exact(2)
                .try_fold(args[0].clone(), |coll, kv| {
                    assoc(coll, kv[0].clone(), kv[1].clone())
                })
        }
        CoreFn::Count => {
            check_arity(f, args, 1, Some(1))?;
            count(&args[0]).map(|n| Value::from(n as i64))
        }
        CoreFn::Add => {
            let sum = args
                .iter()
                .try_fold(0i64, |acc, v| Ok::<_, Exceptional>(acc.wrapping_add(long_arg(f, v)?)))?;
            Ok(Value::from(sum))
        }
        CoreFn::Sub => {
            check_arity(f, args, 1, None)?;
            let first = long_arg(f, &args[0])?;
            if args.len() == 1 {
                return Ok(Value::from(first.wrapping_neg()));
            }
            let diff = args[1..]
                .iter()
                .try_fold(first, |acc, v| Ok::<_, Exceptional>(acc.wrapping_sub(long_arg(f, v)?)))?;
            Ok(Value::from(diff))
        }
        CoreFn::Eq => {
            check_arity(f, args, 1, None)?;
            Ok(Value::from(args.windows(2).all(|w| w[0] == w[1])))
        }
        CoreFn::Assert => {
            for (i, arg) in args.iter().enumerate() {
                if !arg.is_truthy() {
                    return Err(Exceptional::coded(
                        ErrorCode::Assert,
                        format!("assertion {} failed", i),
                    ));
                }
            }
            Ok(Value::Nil)
        }
        CoreFn::Fail => {
            check_arity(f, args, 0, Some(2))?;
            Err(match args {
                [] => Exceptional::error(ErrorCode::Assert, Value::Nil),
                [message] => Exceptional::error(ErrorCode::Assert, message.clone()),
                [code, _] if code.is_nil() => {
                    Exceptional::coded(ErrorCode::Argument, "error code must not be nil")
                }
                [code, message] => Exceptional::error(code.clone(), message.clone()),
                _ => Exceptional::coded(ErrorCode::Unexpected, "fail arity"),
            })
        }
        CoreFn::Return | CoreFn::Rollback | CoreFn::Halt => {
            check_arity(f, args, 0, Some(1))?;
            let payload = args.first().cloned().unwrap_or_default();
            Err(match f {
                CoreFn::Return => Exceptional::Return(payload),
                CoreFn::Rollback => Exceptional::Rollback(payload),
                _ => Exceptional::Halt(payload),
            })
        }
        CoreFn::Transfer | CoreFn::Balance | CoreFn::SetHolding => Err(Exceptional::coded(
            ErrorCode::Unexpected,
            format!("{} requires a context", f.name()),
        )),
    }
}

// ============================================================================
// Core function helpers
// ============================================================================

fn arity_error(f: CoreFn, got: usize) -> Exceptional {
    Exceptional::coded(
        ErrorCode::Arity,
        format!("wrong number of arguments to '{}': got {}", f.name(), got),
    )
}

fn check_arity(f: CoreFn, args: &[Value], min: usize, max: Option<usize>) -> Result<()> {
    let n = args.len();
    if n < min || max.is_some_and(|max| n > max) {
        return Err(arity_error(f, n));
    }
    Ok(())
}

fn cast_error(f: CoreFn, expected: &str, got: &Value) -> Exceptional {
    Exceptional::coded(
        ErrorCode::Cast,
        format!("{}: expected {}, got {}", f.name(), expected, got.type_name()),
    )
}

fn long_arg(f: CoreFn, v: &Value) -> Result<i64> {
    v.as_long().ok_or_else(|| cast_error(f, "long", v))
}

fn address_arg(f: CoreFn, v: &Value) -> Result<Address> {
    v.as_address().ok_or_else(|| cast_error(f, "address", v))
}

fn transfer_args(args: &[Value]) -> Result<(Address, i64)> {
    let f = CoreFn::Transfer;
    check_arity(f, args, 2, Some(2))?;
    Ok((address_arg(f, &args[0])?, long_arg(f, &args[1])?))
}

fn balance_target(ctx: &Context, args: &[Value]) -> Result<Address> {
    let f = CoreFn::Balance;
    check_arity(f, args, 0, Some(1))?;
    match args.first() {
        Some(v) => address_arg(f, v),
        None => Ok(ctx.address()),
    }
}

fn holding_args(args: &[Value]) -> Result<(Address, Value)> {
    let f = CoreFn::SetHolding;
    check_arity(f, args, 2, Some(2))?;
    Ok((address_arg(f, &args[0])?, args[1].clone()))
}

fn conj(coll: Value, x: Value) -> Result<Value> {
    match coll {
        Value::Nil => Ok(Value::List(List::of([x]))),
        Value::Set(s) => Ok(Value::Set(s.include(x))),
        Value::Map(m) => match &x {
            Value::Vector(pair) if pair.count() == 2 => match (pair.get(0), pair.get(1)) {
                (Some(k), Some(v)) => Ok(Value::Map(m.assoc(k.clone(), v.clone()))),
                _ => Err(cast_error(CoreFn::Conj, "map entry", &x)),
            },
            _ => Err(cast_error(CoreFn::Conj, "map entry", &x)),
        },
        other => match Seq::from_value(&other) {
            Some(seq) => Ok(seq.conj(x).into_value()),
            None => Err(cast_error(CoreFn::Conj, "collection", &other)),
        },
    }
}

fn assoc(coll: Value, key: Value, value: Value) -> Result<Value> {
    match coll {
        Value::Nil => Ok(Value::Map(Map::of([(key, value)]))),
        Value::Map(m) => Ok(Value::Map(m.assoc(key, value))),
        Value::BlobMap(m) => {
            let blob = match &key {
                Value::Blob(b) => b.clone(),
                Value::Address(a) => a.to_blob(),
                _ => return Err(cast_error(CoreFn::Assoc, "blob key", &key)),
            };
            Ok(Value::BlobMap(m.assoc(blob, value)))
        }
        other => {
            let seq = Seq::from_value(&other)
                .ok_or_else(|| cast_error(CoreFn::Assoc, "associative collection", &other))?;
            let index = long_arg(CoreFn::Assoc, &key)?;
            Ok(seq.assoc(index, value)?.into_value())
        }
    }
}

fn count(v: &Value) -> Result<usize> {
    Ok(match v {
        Value::Nil => 0,
        Value::List(l) => l.count(),
        Value::Vector(v) => v.count(),
        Value::Map(m) => m.count(),
        Value::Set(s) => s.count(),
        Value::BlobMap(m) => m.count(),
        Value::Blob(b) => b.len(),
        Value::String(s) => s.chars().count(),
        other => return Err(cast_error(CoreFn::Count, "countable", other)),
    })
}

/// Build an [`Op`] evaluating to a vector of the given operations' results.
pub fn vector_of(ops: impl IntoIterator<Item = Op>) -> Op {
    Op::invoke(CoreFn::Vector, ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellvm_data::State;

    use crate::juice::Limits;

    fn ctx() -> Context {
        Context::create(State::genesis([1000, 0]), Address::new(0), Limits::default())
    }

    fn run(op: &Op) -> Context {
        eval(&ctx(), op)
    }

    fn code_of(ctx: &Context) -> Option<ErrorCode> {
        ctx.exceptional().and_then(Exceptional::error_code)
    }

    #[test]
    fn test_constant_charges_juice() {
        let c = run(&Op::constant(42));
        assert_eq!(c.result(), &Value::from(42));
        assert_eq!(c.juice_used(), cost::CONSTANT);
    }

    #[test]
    fn test_arithmetic() {
        let op = Op::invoke(CoreFn::Add, [Op::constant(1), Op::constant(2), Op::constant(3)]);
        assert_eq!(run(&op).result(), &Value::from(6));
        let op = Op::invoke(CoreFn::Sub, [Op::constant(5)]);
        assert_eq!(run(&op).result(), &Value::from(-5));
        let op = Op::invoke(CoreFn::Sub, [Op::constant(10), Op::constant(4)]);
        assert_eq!(run(&op).result(), &Value::from(6));
    }

    #[test]
    fn test_cast_error() {
        let op = Op::invoke(CoreFn::Add, [Op::constant("one")]);
        assert_eq!(code_of(&run(&op)), Some(ErrorCode::Cast));
    }

    #[test]
    fn test_cond_with_default() {
        let op = Op::Cond(vec![
            Op::constant(false),
            Op::constant(1),
            Op::constant(Value::Nil),
            Op::constant(2),
            Op::constant(3),
        ]);
        assert_eq!(run(&op).result(), &Value::from(3));
        let op = Op::Cond(vec![Op::constant(false), Op::constant(1)]);
        assert_eq!(run(&op).result(), &Value::Nil);
    }

    #[test]
    fn test_do_short_circuits() {
        let op = Op::Do(vec![
            Op::def("a", Op::constant(1)),
            Op::invoke(CoreFn::Fail, [Op::constant("stop")]),
            Op::def("b", Op::constant(2)),
        ]);
        let c = run(&op);
        assert_eq!(code_of(&c), Some(ErrorCode::Assert));
        assert!(c.environment().is_defined(&Symbol::new("a")));
        assert!(!c.environment().is_defined(&Symbol::new("b")));
    }

    #[test]
    fn test_fail_with_nil_code_is_argument_error() {
        let op = Op::invoke(CoreFn::Fail, [Op::constant(Value::Nil), Op::constant("m")]);
        assert_eq!(code_of(&run(&op)), Some(ErrorCode::Argument));
    }

    #[test]
    fn test_conj_and_assoc() {
        let op = Op::invoke(
            CoreFn::Conj,
            [Op::invoke(CoreFn::List, [Op::constant(2)]), Op::constant(1)],
        );
        assert_eq!(run(&op).result(), &Value::from(List::of([1, 2])));

        let op = Op::invoke(
            CoreFn::Assoc,
            [vector_of([Op::constant(1)]), Op::constant(4), Op::constant(0)],
        );
        assert_eq!(code_of(&run(&op)), Some(ErrorCode::Bounds));
    }

    #[test]
    fn test_control_signals() {
        let op = Op::Do(vec![
            Op::invoke(CoreFn::Return, [Op::constant(2)]),
            Op::constant(99),
        ]);
        assert_eq!(
            run(&op).exceptional(),
            Some(&Exceptional::Return(Value::from(2)))
        );
    }

    #[test]
    fn test_depth_limit() {
        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        let c = Context::create(State::genesis([1]), Address::new(0), limits);
        let mut op = Op::constant(1);
        for _ in 0..5 {
            op = Op::Do(vec![op]);
        }
        assert_eq!(code_of(&eval(&c, &op)), Some(ErrorCode::Depth));
        let shallow = Op::Do(vec![Op::Do(vec![Op::constant(1)])]);
        let ok = eval(&c, &shallow);
        assert_eq!(ok.result(), &Value::from(1));
        assert_eq!(ok.depth(), 0);
    }

    #[test]
    fn test_balance_and_transfer() {
        let op = Op::Do(vec![
            Op::invoke(CoreFn::Transfer, [Op::constant(Address::new(1)), Op::constant(250)]),
            Op::invoke(CoreFn::Balance, []),
        ]);
        let c = run(&op);
        assert_eq!(c.result(), &Value::from(750));
        assert_eq!(c.balance(Address::new(1)), Some(250));
    }

    #[test]
    fn test_display() {
        let op = Op::def("x", Op::invoke(CoreFn::Add, [Op::constant(1), Op::lookup("y")]));
        assert_eq!(op.to_string(), "(def x (+ 1 y))");
        assert_eq!(CoreFn::from_name("rollback"), Some(CoreFn::Rollback));
    }
}
