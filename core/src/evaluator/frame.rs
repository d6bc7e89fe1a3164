//! Parser states and typed operator-stack frames.

use crate::evaluator::operators::Op;

/// What the parser will admit next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    /// Beginning of a statement or of the input.
    Start,
    /// Immediately after a numeric literal or any reduced value.
    Num,
    /// Immediately after an identifier, before it is resolved.
    Ident,
    /// Just inside an open grouping parenthesis.
    Paren,
    /// Inside a call's argument list, before the next argument.
    Call,
    /// Waiting for the right operand of a binary operator.
    Binop(Op),
    /// Waiting for the operand of a unary operator (assignment included).
    Unop(Op),
}

impl State {
    /// A literal, identifier, unary operator, or `(` may begin an operand.
    pub(super) fn can_literal(self) -> bool {
        matches!(
            self,
            State::Start | State::Paren | State::Call | State::Binop(_) | State::Unop(_)
        )
    }

    /// A binary operator, comma, `)`, or `;` may follow.
    pub(super) fn after_literal(self) -> bool {
        matches!(self, State::Num | State::Ident)
    }

    /// `;` is accepted here.
    pub(super) fn can_statement(self) -> bool {
        matches!(self, State::Start | State::Call | State::Num | State::Ident)
    }

    /// The frame a new operand start leaves behind: barrier states become
    /// fold barriers, operator states become the pending operator itself.
    pub(super) fn into_frame(self) -> Frame {
        match self {
            State::Start => Frame::Start,
            State::Paren => Frame::Paren,
            State::Call => Frame::Call,
            State::Binop(op) | State::Unop(op) => Frame::Op(op),
            // operands can only begin in the states above
            State::Num | State::Ident => unreachable!("operand started after a literal"),
        }
    }
}

/// One entry of the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Frame {
    /// Statement barrier; the bottom sentinel is one of these and is never
    /// popped.
    Start,
    /// Barrier for an open grouping parenthesis.
    Paren,
    /// Barrier between a call's bookkeeping and the argument being parsed.
    Call,
    /// A shifted operator awaiting reduction.
    Op(Op),
    /// A deferred identifier: assignment target or callee name, as a span
    /// into the source.
    Ident { start: usize, len: usize },
    /// Running argument count of the innermost open call.
    ArgCount(u32),
    /// Context saved when a bracket opens: comma handling and the
    /// argument-counter location of the enclosing scan, restored on close.
    Context { scanning_args: bool, arg_slot: usize },
}
