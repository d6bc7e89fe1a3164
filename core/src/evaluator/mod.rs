//! Single-pass expression evaluation.
//!
//! Evaluates C-like integer expressions in one pass over the source, with no
//! syntax tree: two bounded stacks implement operator-precedence parsing with
//! inline reduction.
//!
//! ## Design Principles
//!
//! - **One pass**: the cursor advances monotonically; reductions happen the
//!   moment precedence allows them
//! - **Bounded**: both stacks have a hard capacity, so pathological nesting
//!   is reported rather than unbounded
//! - **Host at the seam**: every name — variable, function, assignment
//!   target — goes through a single [`Host`](crate::host::Host) callback
//!
//! ## Example
//!
//! ```
//! use foldeval_core::evaluate;
//!
//! assert_eq!(evaluate("16 * 17 + 18", None), Ok(290));
//! assert_eq!(evaluate("(5 - 5 - 5) == -5", None), Ok(1));
//! assert_eq!(evaluate("2 ** 3 ** 2", None), Ok(512));
//! ```

mod error;
mod frame;
mod machine;
mod operators;


pub use error::EvalError;

use crate::host::Host;

/// Options for configuring an evaluation.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Capacity of the operator and value stacks. Each nesting level
    /// (parenthesis, call, pending operator) occupies one or two entries;
    /// exhausting the capacity fails with
    /// [`EvalError::TooDeeplyNested`].
    pub max_depth: usize,
    /// Accept `;` inside a call's argument list. Each statement's value is
    /// discarded except the last, which becomes the argument:
    /// `f(a = 1; a + 1)` passes `2`. When disabled, a `;` between call
    /// parentheses is a syntax error.
    pub statements_in_call_args: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            statements_in_call_args: true,
        }
    }
}

/// Evaluate `source` with default options.
///
/// Statements are separated by `;`; the result is the value of the last
/// evaluated statement (`0` for empty input). `host` resolves identifiers,
/// calls, and assignments; without one, any identifier use fails with
/// [`EvalError::NullFunction`].
///
/// ```
/// use foldeval_core::{evaluate, host_fn, Request};
///
/// let mut x = 0;
/// let mut host = host_fn(|_name, request| match request {
///     Request::Assign(value) => {
///         x = value;
///         value
///     }
///     _ => x,
/// });
/// assert_eq!(evaluate("x = 20; x + x + 2", Some(&mut host)), Ok(42));
/// ```
pub fn evaluate(source: &str, host: Option<&mut dyn Host>) -> Result<i32, EvalError> {
    evaluate_with_options(&EvalOptions::default(), source, host)
}

/// Evaluate `source` with explicit options.
///
/// ```
/// use foldeval_core::{EvalError, EvalOptions, evaluate_with_options};
///
/// let options = EvalOptions {
///     max_depth: 8,
///     ..EvalOptions::default()
/// };
/// let deep = "((((((((1))))))))";
/// assert_eq!(
///     evaluate_with_options(&options, deep, None),
///     Err(EvalError::TooDeeplyNested),
/// );
/// ```
pub fn evaluate_with_options(
    options: &EvalOptions,
    source: &str,
    host: Option<&mut dyn Host>,
) -> Result<i32, EvalError> {
    machine::Machine::new(options, source, host).run()
}
