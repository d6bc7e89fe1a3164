//! Foldeval - a single-pass, C-like integer expression evaluator
//!
//! # Overview
//!
//! Foldeval evaluates textual expressions with C operator semantics on `i32`,
//! in one pass over the input and without building a syntax tree. It is meant
//! for embedding: filter conditions, tiny config formulas, calculator-style
//! command languages. Every identifier — variable read, function call, or
//! assignment target — is delegated to a host callback, so the embedding
//! application decides what names mean.
//!
//! Statements are separated by `;` and the last one's value is the result.
//! The operator set is the C one (`+ - * / % << >> < <= > >= == != & ^ | &&
//! || = ! ~`, with unary `+`/`-`) plus right-associative `**` for power;
//! `&&` and `||` short-circuit, suppressing host effects in dead branches.
//!
//! # Quick Start
//!
//! ```
//! use foldeval::evaluate;
//!
//! assert_eq!(evaluate("16 * 17 + 18", None), Ok(290));
//! assert_eq!(evaluate("(5 - 5 - 5) == -5", None), Ok(1));
//! assert_eq!(evaluate("2 ** 3 ** 2", None), Ok(512));
//! ```
//!
//! # Hosts
//!
//! A host resolves names. Closures work through [`host_fn`]; stateful hosts
//! implement [`Host`] directly.
//!
//! ```
//! use foldeval::{Request, evaluate, host_fn};
//! use std::collections::HashMap;
//!
//! let mut vars: HashMap<String, i32> = HashMap::new();
//! let mut host = host_fn(|name, request| match request {
//!     Request::Assign(value) => {
//!         vars.insert(name.to_string(), value);
//!         value
//!     }
//!     Request::Value => vars.get(name).copied().unwrap_or(0),
//!     Request::Call(args) => args.iter().sum(),
//! });
//!
//! assert_eq!(
//!     evaluate("a = 10; b = 17; sum(a, b, 15)", Some(&mut host)),
//!     Ok(42),
//! );
//! ```
//!
//! # Errors
//!
//! Failures carry a fixed diagnostic string:
//!
//! ```
//! use foldeval::evaluate;
//!
//! let err = evaluate("1 + ", None).unwrap_err();
//! assert_eq!(err.diagnostic(), "incomplete expression");
//! ```

pub use foldeval_core::{
    ERROR_VALUE, EvalError, EvalOptions, Host, Request, evaluate, evaluate_with_options, host_fn,
};
