//! Logical operators, truthiness, and short-circuit suppression.

use foldeval::{EvalError, Request, evaluate, host_fn};
use pretty_assertions::assert_eq;

#[test]
fn truth_table() {
    assert_eq!(evaluate("1 && 1", None), Ok(1));
    assert_eq!(evaluate("1 && 0", None), Ok(0));
    assert_eq!(evaluate("0 && 1", None), Ok(0));
    assert_eq!(evaluate("0 || 0", None), Ok(0));
    assert_eq!(evaluate("0 || 1", None), Ok(1));
    assert_eq!(evaluate("1 || 0", None), Ok(1));
}

#[test]
fn any_nonzero_is_true() {
    assert_eq!(evaluate("2 && 3", None), Ok(1));
    assert_eq!(evaluate("-1 && -1", None), Ok(1));
    assert_eq!(evaluate("0 || -7", None), Ok(1));
}

#[test]
fn chains() {
    assert_eq!(evaluate("1 && 0 && 1", None), Ok(0));
    assert_eq!(evaluate("1 || 1 && 0", None), Ok(1));
    assert_eq!(evaluate("0 || 1 && 1", None), Ok(1));
}

#[test]
fn short_circuit_skips_host_calls() {
    let mut invocations = 0;
    let mut host = host_fn(|_name, _request| {
        invocations += 1;
        1
    });
    assert_eq!(evaluate("0 && effect()", Some(&mut host)), Ok(0));
    assert_eq!(evaluate("1 || effect()", Some(&mut host)), Ok(1));
    drop(host);
    assert_eq!(invocations, 0);
}

#[test]
fn taken_branch_still_calls_the_host() {
    let mut invocations = 0;
    let mut host = host_fn(|_name, _request| {
        invocations += 1;
        1
    });
    assert_eq!(evaluate("1 && effect()", Some(&mut host)), Ok(1));
    drop(host);
    assert_eq!(invocations, 1);
}

#[test]
fn suppression_nests() {
    let mut invocations = 0;
    let mut host = host_fn(|_name, _request| {
        invocations += 1;
        1
    });
    assert_eq!(
        evaluate("0 && (f() || g() && h())", Some(&mut host)),
        Ok(0)
    );
    drop(host);
    assert_eq!(invocations, 0);
}

#[test]
fn skipped_assignment_is_suppressed_entirely() {
    // even the null-host check is bypassed for a suppressed setter
    assert_eq!(evaluate("0 && (a = 5)", None), Ok(0));
    // but a suppressed read still requires a host to exist
    assert_eq!(evaluate("0 && a", None), Err(EvalError::NullFunction));
}

#[test]
fn logical_result_reflects_both_operands() {
    let mut host = host_fn(|_name, request| match request {
        Request::Call(_) => 0,
        _ => 5,
    });
    // the call runs and returns 0, which decides the conjunction
    assert_eq!(evaluate("1 && zero()", Some(&mut host)), Ok(0));
}
