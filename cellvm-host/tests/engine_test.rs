// cellvm-host - Engine integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

mod common;

use common::*;

// ============================================================================
// Sequence validation
// ============================================================================

#[test]
fn test_sequence_must_increment() {
    let mut engine = engine();
    let one = engine.apply(&Transaction::invoke(HERO, 1, Op::constant(1)));
    assert_result!(one, 1);
    let two = engine.apply(&Transaction::invoke(HERO, 2, Op::constant(2)));
    assert_result!(two, 2);

    let before = engine.state().clone();
    let again = engine.apply(&Transaction::invoke(HERO, 2, Op::def("x", Op::constant(3))));
    assert_code!(again, ErrorCode::Sequence);
    assert_eq!(again.juice_used(), 0);
    assert!(engine.state().ptr_eq(&before));
    assert_eq!(engine.lookup(HERO, "x"), None);
    assert_eq!(engine.state().account(HERO).map(|a| a.sequence()), Some(2));
}

#[test]
fn test_sequence_error_response() {
    let mut engine = engine();
    let response = engine.submit(7, &Transaction::invoke(HERO, 2, Op::constant(1)));
    assert_eq!(response.error_code(), Some(ErrorCode::Sequence));
    assert_eq!(
        response.to_json().unwrap(),
        r#"{"id":7,"error":{"code":":SEQUENCE","message":"expected 1, got 2"},"juice_used":0}"#
    );
}

#[test]
fn test_unknown_origin() {
    let mut engine = engine();
    let ctx = engine.apply(&Transaction::invoke(Address::new(9), 1, Op::constant(1)));
    assert_code!(ctx, ErrorCode::Nobody);
}

// ============================================================================
// Commit and discard
// ============================================================================

#[test]
fn test_definitions_persist() {
    let mut engine = engine();
    engine.apply(&Transaction::invoke(HERO, 1, Op::def("x", Op::constant(10))));
    let ctx = engine.apply(&Transaction::invoke(
        HERO,
        2,
        add(Op::lookup("x"), Op::constant(5)),
    ));
    assert_result!(ctx, 15);
    assert_eq!(engine.get_as::<i64>(HERO, "x"), Some(10));
    // other accounts do not see the binding
    assert_code!(
        engine.query(VILLAIN, &Op::lookup("x")),
        ErrorCode::Undeclared
    );
}

#[test]
fn test_failed_transaction_leaves_state_identical() {
    let mut engine = engine();
    let before = engine.state().encode();
    let op = Op::Do(vec![
        Op::def("x", Op::constant(1)),
        Op::invoke(CoreFn::Transfer, [Op::constant(VILLAIN), Op::constant(1000)]),
        Op::invoke(CoreFn::Fail, [Op::constant("boom")]),
    ]);
    let ctx = engine.apply(&Transaction::invoke(HERO, 1, op));
    assert!(ctx.is_exceptional());
    assert_eq!(engine.state().encode(), before);
    assert_eq!(engine.state().account(HERO).map(|a| a.sequence()), Some(0));
}

#[test]
fn test_return_commits_payload() {
    let mut engine = engine();
    let op = Op::Do(vec![
        Op::def("x", Op::constant(1)),
        Op::invoke(CoreFn::Return, [Op::constant(2)]),
        Op::def("y", Op::constant(3)),
    ]);
    let ctx = engine.apply(&Transaction::invoke(HERO, 1, op));
    assert_result!(ctx, 2);
    assert_eq!(engine.get_as::<i64>(HERO, "x"), Some(1));
    assert_eq!(engine.lookup(HERO, "y"), None);
}

#[test]
fn test_halt_commits_payload() {
    let mut engine = engine();
    let op = Op::Do(vec![
        Op::def("x", Op::constant(1)),
        Op::invoke(CoreFn::Halt, [Op::constant("done")]),
    ]);
    let response = engine.submit(3, &Transaction::invoke(HERO, 1, op));
    assert_eq!(response.value(), Some(&Value::from("done")));
    assert_eq!(engine.get_as::<i64>(HERO, "x"), Some(1));
}

#[test]
fn test_rollback_discards_state() {
    let mut engine = engine();
    let before = engine.state().clone();
    let op = Op::Do(vec![
        Op::def("x", Op::constant(1)),
        Op::invoke(CoreFn::Transfer, [Op::constant(VILLAIN), Op::constant(1000)]),
        Op::invoke(CoreFn::Rollback, [Op::constant(3)]),
    ]);
    let ctx = engine.apply(&Transaction::invoke(HERO, 1, op));
    assert_result!(ctx, 3);
    assert_eq!(engine.state().encode(), before.encode());
    assert_eq!(engine.state().content_hash(), before.content_hash());
    assert!(ctx.state().ptr_eq(&before));
}

// ============================================================================
// Transfers
// ============================================================================

#[test]
fn test_transfer_transaction() {
    let mut engine = engine();
    let total = engine.state().total_funds();
    let response = engine.submit(1, &Transaction::transfer(HERO, 1, VILLAIN, 1000));
    assert_eq!(response.value(), Some(&Value::from(1000)));
    assert_eq!(response.juice_used, 100);
    assert_eq!(engine.state().balance(HERO), Some(HERO_BALANCE - 1000));
    assert_eq!(engine.state().balance(VILLAIN), Some(VILLAIN_BALANCE + 1000));
    assert_eq!(engine.state().total_funds(), total);
}

#[test]
fn test_transfer_insufficient_funds() {
    let mut engine = engine();
    let ctx = engine.apply(&Transaction::transfer(VILLAIN, 1, HERO, VILLAIN_BALANCE + 1));
    assert_code!(ctx, ErrorCode::Funds);
    assert_eq!(engine.state().balance(VILLAIN), Some(VILLAIN_BALANCE));
    // the rejected transaction did not consume the sequence number
    let ctx = engine.apply(&Transaction::transfer(VILLAIN, 1, HERO, 1));
    assert_result!(ctx, 1);
}

#[test]
fn test_juice_limit_from_config() {
    let config = EngineConfig::from_toml_str("juice_limit = 50").unwrap();
    let mut engine = Engine::with_config(State::genesis([1000, 0]), config);
    let ctx = engine.apply(&Transaction::transfer(HERO, 1, VILLAIN, 1));
    assert_code!(ctx, ErrorCode::Juice);
    assert_eq!(engine.state().balance(VILLAIN), Some(0));
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_apply_block() {
    let mut engine = engine();
    let txs = [
        Transaction::invoke(HERO, 1, Op::def("t", Op::lookup("*timestamp*"))),
        Transaction::transfer(VILLAIN, 1, HERO, 5),
        Transaction::invoke(HERO, 1, Op::constant(0)),
    ];
    let results = engine.apply_block(42, &txs);
    assert_eq!(results.len(), 3);
    assert_eq!(engine.state().timestamp(), 42);
    assert_eq!(engine.get_as::<i64>(HERO, "t"), Some(42));
    assert!(!results[1].is_exceptional());
    assert_code!(results[2], ErrorCode::Sequence);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_query_does_not_commit() {
    let engine = engine();
    let before = engine.state().clone();
    let ctx = engine.query(HERO, &Op::def("x", Op::constant(1)));
    assert_result!(ctx, 1);
    assert!(engine.state().ptr_eq(&before));
    assert_eq!(engine.lookup(HERO, "x"), None);
}

#[test]
fn test_query_all_parallel() {
    let mut engine = engine();
    engine.apply(&Transaction::invoke(HERO, 1, Op::def("x", Op::constant(7))));
    let queries: Vec<(Address, Op)> = (0..8i64)
        .map(|i| (HERO, add(Op::lookup("x"), Op::constant(i))))
        .collect();
    let results = engine.query_all(&queries);
    for (i, ctx) in results.iter().enumerate() {
        assert_result!(*ctx, 7 + i as i64);
    }
}

#[test]
fn test_holding_commits_with_transaction() {
    let mut engine = engine();
    let set = Op::invoke(CoreFn::SetHolding, [Op::constant(VILLAIN), Op::constant(5)]);
    assert_result!(engine.apply(&Transaction::invoke(HERO, 1, set.clone())), 5);
    let key = VILLAIN.to_blob();
    let holdings = engine.state().account(HERO).unwrap().holdings().clone();
    assert_eq!(holdings.get(key.as_bytes()), Some(&Value::from(5)));

    let undone = Op::Do(vec![set, Op::invoke(CoreFn::Rollback, [])]);
    engine.apply(&Transaction::invoke(VILLAIN, 1, undone));
    assert!(engine.state().account(VILLAIN).unwrap().holdings().is_empty());
}

#[test]
fn test_query_balance() {
    let engine = engine();
    let op = Op::invoke(CoreFn::Balance, [Op::constant(VILLAIN)]);
    assert_result!(engine.query(HERO, &op), VILLAIN_BALANCE);
}
