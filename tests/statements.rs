//! Statement separation and the statements-inside-arguments flag.

use foldeval::{EvalError, EvalOptions, Request, evaluate, evaluate_with_options, host_fn};
use pretty_assertions::assert_eq;

#[test]
fn last_statement_value_is_returned() {
    assert_eq!(evaluate("1; 2; 3", None), Ok(3));
    assert_eq!(evaluate("2 + 2; 3 * 3", None), Ok(9));
}

#[test]
fn trailing_semicolon_keeps_the_last_value() {
    assert_eq!(evaluate("5;", None), Ok(5));
    assert_eq!(evaluate("5; ;", None), Ok(5));
}

#[test]
fn empty_statements_are_fine() {
    assert_eq!(evaluate(";", None), Ok(0));
    assert_eq!(evaluate(";;;", None), Ok(0));
    assert_eq!(evaluate("; 7", None), Ok(7));
}

#[test]
fn variables_persist_across_statements() {
    let mut store = std::collections::HashMap::new();
    let mut host = host_fn(|name: &str, request| match request {
        Request::Assign(value) => {
            store.insert(name.to_string(), value);
            value
        }
        _ => store.get(name).copied().unwrap_or(0),
    });
    assert_eq!(
        evaluate("a = 10; b = 17; a + b", Some(&mut host)),
        Ok(27)
    );
}

#[test]
fn statement_inside_arguments_keeps_the_last_expression() {
    let mut host = host_fn(|_name, request| match request {
        Request::Call(args) => args.iter().sum(),
        _ => 0,
    });
    assert_eq!(evaluate("sum(1; 2, 3)", Some(&mut host)), Ok(5));
    assert_eq!(evaluate("sum(1; 2; 3, 4)", Some(&mut host)), Ok(7));
}

#[test]
fn statement_inside_arguments_can_be_disabled() {
    let options = EvalOptions {
        statements_in_call_args: false,
        ..EvalOptions::default()
    };
    let mut host = host_fn(|_name, request| match request {
        Request::Call(args) => args.iter().sum(),
        _ => 0,
    });
    assert_eq!(
        evaluate_with_options(&options, "sum(1; 2, 3)", Some(&mut host)),
        Err(EvalError::Syntax)
    );
    // plain statements are unaffected by the flag
    assert_eq!(evaluate_with_options(&options, "1; 2", None), Ok(2));
}

#[test]
fn statement_reset_does_not_leak_into_groups() {
    assert_eq!(
        evaluate("(1; 2)", None),
        Err(EvalError::UnexpectedParenthesis)
    );
}

#[test]
fn semicolon_needs_a_complete_expression() {
    assert_eq!(evaluate("1 + ;", None), Err(EvalError::Syntax));
}
