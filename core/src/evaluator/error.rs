//! Evaluation errors and their diagnostic strings.
//!
//! Every failure maps to a fixed, static diagnostic. The first error wins:
//! evaluation stops immediately and no partial progress is reported. Host
//! return values are never interpreted as errors by the core (see
//! [`crate::host::ERROR_VALUE`] for the host-side convention).

use core::fmt;

/// Why an evaluation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// An identifier, call, or assignment was reached with no host attached.
    NullFunction,
    /// `**` with a negative right operand.
    NegativePower,
    /// Defensive: an operator frame that matches no primitive.
    UnrecognizedOperator,
    /// The input ended while operators or brackets were still open.
    IncompleteExpression,
    /// An argument comma whose call barrier is missing from the stack.
    UnknownStateAtComma,
    /// A `)` that closes neither a group nor a call.
    UnexpectedParenthesis,
    /// A character that no parser state admits.
    Syntax,
    /// `/` or `%` with a zero right operand.
    DivisionByZero,
    /// Operator or value stack capacity exhausted.
    TooDeeplyNested,
}

impl EvalError {
    /// The static diagnostic string for this error.
    pub fn diagnostic(self) -> &'static str {
        match self {
            EvalError::NullFunction => "calling a null function",
            EvalError::NegativePower => "negative powers not supported",
            EvalError::UnrecognizedOperator => "unrecognized operator",
            EvalError::IncompleteExpression => "incomplete expression",
            EvalError::UnknownStateAtComma => "unknown state found at comma",
            EvalError::UnexpectedParenthesis => "unexpected parenthesis",
            EvalError::Syntax => "syntax error",
            EvalError::DivisionByZero => "division by zero",
            EvalError::TooDeeplyNested => "expression too deeply nested",
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diagnostic())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EvalError {}
