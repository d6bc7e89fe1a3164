//! The host callback protocol.
//!
//! The evaluator itself has no notion of named values: every identifier it
//! encounters — a bare variable read, a function call, or an assignment
//! target — is delegated to a host through a single seam, the [`Host`] trait.
//! Identifier names are borrowed straight out of the source text and argument
//! slices out of the evaluator's value stack; neither may be retained after
//! the call returns, which the borrows enforce.

/// Conventional failure value for hosts.
///
/// The evaluator never inspects host return values; a host that wants to
/// signal failure can return this sentinel and let it propagate to the caller
/// as an ordinary result. A legitimate computation can of course produce the
/// same value, so callers that care should track failure on the host itself.
pub const ERROR_VALUE: i32 = i32::MIN;

/// What the evaluator wants from the host for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    /// A bare identifier read, or a call with an empty argument list.
    ///
    /// The two are deliberately indistinguishable: `x` and `x()` reach the
    /// host identically, so hosts are free to treat names as variables,
    /// zero-argument functions, or both.
    Value,
    /// A call with one or more positional arguments, in source order.
    Call(&'a [i32]),
    /// An assignment. The host stores the value under the name and returns
    /// the stored value (which is what the assignment expression yields).
    Assign(i32),
}

/// Resolves identifiers on behalf of the evaluator.
///
/// Implementations may be stateful (variable stores, effectful builtins) and
/// may themselves re-enter the evaluator; no state is shared between
/// evaluations, so re-entrancy needs no special care.
pub trait Host {
    /// Resolve `name` according to `request` and produce its value.
    fn call(&mut self, name: &str, request: Request<'_>) -> i32;
}

impl<F> Host for F
where
    F: FnMut(&str, Request<'_>) -> i32,
{
    fn call(&mut self, name: &str, request: Request<'_>) -> i32 {
        self(name, request)
    }
}

/// Identity helper that pins a closure to the borrowed [`Host`] signature.
///
/// Closure lifetime inference sometimes picks concrete lifetimes for the
/// `name` and `Request` borrows; passing the closure through this function
/// fixes the higher-ranked signature the blanket impl needs.
///
/// ```
/// use foldeval_core::{evaluate, host_fn, Request};
///
/// let mut host = host_fn(|_name, request| match request {
///     Request::Call(args) => args.iter().sum(),
///     _ => 0,
/// });
/// assert_eq!(evaluate("sum(1, 2, 3)", Some(&mut host)), Ok(6));
/// ```
pub fn host_fn<F>(f: F) -> F
where
    F: FnMut(&str, Request<'_>) -> i32,
{
    f
}
