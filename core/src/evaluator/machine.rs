//! The single-pass machine: lexer, state transitions, fold pass, dispatch.
//!
//! The machine walks the source once, left to right. Each significant
//! character either extends a token, performs a state transition (usually
//! pushing one frame), or triggers a fold that reduces pending operators
//! against the value stack. Nothing resembling a syntax tree is ever built.
//!
//! Stack discipline: every operand start (identifier, literal, unary
//! operator, `(`) pushes one frame derived from the current state. Barrier
//! states (`Start`, `Paren`, `Call`) become fold barriers; operator states
//! become the pending `Frame::Op` itself. The fold pass pops `Op` frames
//! until it reaches a barrier or an operator that binds more loosely than the
//! incoming one, so a finished statement always folds down to exactly the
//! barrier its first operand pushed.
//!
//! Short-circuiting: shifting `&&` with a zero left operand (or `||` with a
//! non-zero one) raises `skip_depth`. While raised, reductions produce `0`
//! without applying primitives and the host is never invoked, so effects in
//! dead branches are suppressed; folding the matching `&&`/`||` lowers it.

use tracing::trace;

use crate::evaluator::frame::{Frame, State};
use crate::evaluator::operators::{self, Op};
use crate::evaluator::{EvalError, EvalOptions};
use crate::host::{Host, Request};
use crate::stack::Stack;

/// Identifier bytes come from the ASCII letter/digit/underscore classes, so
/// the span is always valid UTF-8.
fn ident_str(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(name) => name,
        Err(_) => unreachable!("identifier bytes are ASCII"),
    }
}

pub(super) struct Machine<'s, 'h> {
    src: &'s [u8],
    cursor: usize,
    state: State,
    /// Most recently produced value: literal, resolved identifier, call
    /// result, or fold result.
    last_value: i32,
    /// Span of the most recently scanned identifier, kept for deferred
    /// resolution.
    last_ident: (usize, usize),
    value_stack: Stack<i32>,
    op_stack: Stack<Frame>,
    /// The innermost open bracket is a call's argument list, so commas
    /// separate arguments there.
    scanning_args: bool,
    /// Index into `op_stack` of the innermost call's `ArgCount` frame; only
    /// meaningful while `scanning_args` is set.
    arg_slot: usize,
    /// Nesting depth of short-circuited subexpressions.
    skip_depth: u32,
    host: Option<&'h mut dyn Host>,
    statements_in_call_args: bool,
}

impl<'s, 'h> Machine<'s, 'h> {
    pub(super) fn new(
        options: &EvalOptions,
        source: &'s str,
        host: Option<&'h mut dyn Host>,
    ) -> Self {
        Machine {
            src: source.as_bytes(),
            cursor: 0,
            state: State::Start,
            last_value: 0,
            last_ident: (0, 0),
            value_stack: Stack::new(options.max_depth),
            op_stack: Stack::new(options.max_depth),
            scanning_args: false,
            arg_slot: 0,
            skip_depth: 0,
            host,
            statements_in_call_args: options.statements_in_call_args,
        }
    }

    pub(super) fn run(mut self) -> Result<i32, EvalError> {
        // bottom sentinel; the fold pass stops here and never pops it
        self.push_frame(Frame::Start)?;

        loop {
            let ch = self.next_significant();
            if ch == 0 {
                return self.finish();
            }

            if self.state.can_literal() {
                match ch {
                    c if c.is_ascii_alphabetic() || c == b'_' => {
                        self.scan_ident()?;
                        continue;
                    }
                    b'0' if matches!(self.peek_ahead(1), b'x' | b'X') => {
                        self.scan_hex()?;
                        continue;
                    }
                    c if c.is_ascii_digit() => {
                        self.scan_decimal()?;
                        continue;
                    }
                    b'-' | b'+' | b'!' | b'~' => {
                        self.shift_unary(ch)?;
                        continue;
                    }
                    b'(' => {
                        self.open_group()?;
                        continue;
                    }
                    _ => {}
                }
            }

            if ch == b';' && self.state.can_statement() {
                self.end_statement()?;
                continue;
            }

            if self.state.after_literal() {
                if ch == b',' && self.scanning_args {
                    self.commit_argument()?;
                    continue;
                }
                if ch == b')' {
                    self.close_bracket()?;
                    continue;
                }
                if let Some((op, width)) = self.scan_operator(ch) {
                    self.shift_binary(op, width)?;
                    continue;
                }
                if ch == b'(' && self.state == State::Ident {
                    self.open_call()?;
                    continue;
                }
            }

            if ch == b')' && self.state == State::Call {
                self.close_empty_call()?;
                continue;
            }

            return Err(EvalError::Syntax);
        }
    }

    // ----- lexing -----

    #[inline]
    fn peek_ahead(&self, offset: usize) -> u8 {
        match self.src.get(self.cursor + offset) {
            Some(&b) => b,
            None => 0,
        }
    }

    /// Skips whitespace and returns the next significant byte without
    /// consuming it; `0` means end of input (a NUL terminates early).
    fn next_significant(&mut self) -> u8 {
        loop {
            match self.peek_ahead(0) {
                b' ' | b'\t' | b'\n' => self.cursor += 1,
                b => return b,
            }
        }
    }

    fn scan_ident(&mut self) -> Result<(), EvalError> {
        let start = self.cursor;
        self.cursor += 1;
        loop {
            let c = self.peek_ahead(0);
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.cursor += 1;
            } else {
                break;
            }
        }
        self.push_frame(self.state.into_frame())?;
        self.last_ident = (start, self.cursor - start);
        self.state = State::Ident;
        Ok(())
    }

    fn scan_decimal(&mut self) -> Result<(), EvalError> {
        let mut value: i32 = 0;
        loop {
            let c = self.peek_ahead(0);
            if !c.is_ascii_digit() {
                break;
            }
            value = value.wrapping_mul(10).wrapping_add((c - b'0') as i32);
            self.cursor += 1;
        }
        self.push_frame(self.state.into_frame())?;
        self.last_value = value;
        self.state = State::Num;
        Ok(())
    }

    fn scan_hex(&mut self) -> Result<(), EvalError> {
        self.cursor += 2; // 0x
        let mut value: i32 = 0;
        loop {
            let c = self.peek_ahead(0);
            let digit = match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                b'A'..=b'F' => c - b'A' + 10,
                _ => break,
            };
            value = value.wrapping_mul(16).wrapping_add(digit as i32);
            self.cursor += 1;
        }
        // a bare prefix reads as zero
        self.push_frame(self.state.into_frame())?;
        self.last_value = value;
        self.state = State::Num;
        Ok(())
    }

    /// Recognizes a binary operator token at the cursor, longest match first.
    fn scan_operator(&self, ch: u8) -> Option<(Op, usize)> {
        if let Some(op) = Op::from_pair(ch, self.peek_ahead(1)) {
            return Some((op, 2));
        }
        Op::from_single(ch).map(|op| (op, 1))
    }

    // ----- shifts and transitions -----

    fn shift_unary(&mut self, ch: u8) -> Result<(), EvalError> {
        let op = Op::from_unary(ch).ok_or(EvalError::Syntax)?;
        self.push_frame(self.state.into_frame())?;
        self.state = State::Unop(op);
        self.cursor += 1;
        Ok(())
    }

    fn shift_binary(&mut self, op: Op, width: usize) -> Result<(), EvalError> {
        if op == Op::Assign {
            // `=` directly after an identifier defers the name for the
            // setter; anywhere else there is nothing assignable to its left
            if self.state != State::Ident {
                return Err(EvalError::Syntax);
            }
            let (start, len) = self.last_ident;
            self.push_frame(Frame::Ident { start, len })?;
            self.state = State::Unop(Op::Assign);
            self.cursor += width;
            return Ok(());
        }

        self.fold(Some(op))?;

        // a decided `&&`/`||` suppresses its right-hand side
        match op {
            Op::LogAnd if self.last_value == 0 => self.skip_depth += 1,
            Op::LogOr if self.last_value != 0 => self.skip_depth += 1,
            _ => {}
        }

        self.push_value(self.last_value)?;
        self.state = State::Binop(op);
        self.cursor += width;
        Ok(())
    }

    fn open_group(&mut self) -> Result<(), EvalError> {
        self.push_frame(self.state.into_frame())?;
        self.push_frame(Frame::Context {
            scanning_args: self.scanning_args,
            arg_slot: self.arg_slot,
        })?;
        self.scanning_args = false;
        self.state = State::Paren;
        self.cursor += 1;
        Ok(())
    }

    fn open_call(&mut self) -> Result<(), EvalError> {
        let (start, len) = self.last_ident;
        self.push_frame(Frame::Context {
            scanning_args: self.scanning_args,
            arg_slot: self.arg_slot,
        })?;
        self.push_frame(Frame::ArgCount(0))?;
        self.arg_slot = self.op_stack.len() - 1;
        self.push_frame(Frame::Ident { start, len })?;
        self.scanning_args = true;
        self.state = State::Call;
        self.cursor += 1;
        Ok(())
    }

    fn end_statement(&mut self) -> Result<(), EvalError> {
        if self.scanning_args && !self.statements_in_call_args {
            return Err(EvalError::Syntax);
        }
        self.fold(None)?;
        if !matches!(self.state, State::Start | State::Call) {
            // drop the finished statement's operand barrier
            let barrier = self.op_stack.pop();
            debug_assert!(
                matches!(barrier, Some(Frame::Start | Frame::Paren | Frame::Call)),
                "statement folded down to a non-barrier frame"
            );
        }
        trace!(value = self.last_value, "statement complete");
        self.state = if self.scanning_args {
            State::Call
        } else {
            State::Start
        };
        self.cursor += 1;
        Ok(())
    }

    fn commit_argument(&mut self) -> Result<(), EvalError> {
        self.fold(None)?;
        match self.op_stack.pop() {
            Some(Frame::Call) => {}
            _ => return Err(EvalError::UnknownStateAtComma),
        }
        match self.op_stack.get_mut(self.arg_slot) {
            Some(Frame::ArgCount(count)) => *count += 1,
            _ => unreachable!("argument counter missing while scanning arguments"),
        }
        self.push_value(self.last_value)?;
        self.state = State::Call;
        self.cursor += 1;
        Ok(())
    }

    fn close_bracket(&mut self) -> Result<(), EvalError> {
        self.fold(None)?;
        match self.op_stack.peek() {
            Some(Frame::Paren) => {
                self.op_stack.pop();
                match self.op_stack.pop() {
                    Some(Frame::Context {
                        scanning_args,
                        arg_slot,
                    }) => {
                        self.scanning_args = scanning_args;
                        self.arg_slot = arg_slot;
                    }
                    _ => unreachable!("group barrier without its saved context"),
                }
            }
            Some(Frame::Call) if self.scanning_args => {
                self.op_stack.pop();
                self.finish_call(true)?;
            }
            _ => return Err(EvalError::UnexpectedParenthesis),
        }
        self.cursor += 1;
        Ok(())
    }

    /// `)` while an argument is still expected: a zero-argument call, or the
    /// tail of an argument list whose last statement was discarded.
    fn close_empty_call(&mut self) -> Result<(), EvalError> {
        self.finish_call(false)?;
        self.cursor += 1;
        Ok(())
    }

    /// Pops a call's bookkeeping frames and dispatches it. With
    /// `commit_last`, the pending expression is committed as the final
    /// argument first; without it the argument list must be empty.
    fn finish_call(&mut self, commit_last: bool) -> Result<(), EvalError> {
        let (start, len) = match self.op_stack.pop() {
            Some(Frame::Ident { start, len }) => (start, len),
            _ => unreachable!("call close without a callee name"),
        };
        let committed = match self.op_stack.pop() {
            Some(Frame::ArgCount(count)) => count as usize,
            _ => unreachable!("call close without an argument counter"),
        };
        match self.op_stack.pop() {
            Some(Frame::Context {
                scanning_args,
                arg_slot,
            }) => {
                self.scanning_args = scanning_args;
                self.arg_slot = arg_slot;
            }
            _ => unreachable!("call close without its saved context"),
        }

        let argc = if commit_last {
            self.push_value(self.last_value)?;
            committed + 1
        } else {
            if committed != 0 {
                // a committed argument with nothing after the comma
                return Err(EvalError::Syntax);
            }
            0
        };

        self.last_value = self.resolve_call(start, len, argc)?;
        self.value_stack.truncate(self.value_stack.len() - argc);
        self.state = State::Num;
        Ok(())
    }

    // ----- folding -----

    /// Reduces pending operators against the incoming one (`None` reduces
    /// everything down to the nearest barrier). A bare identifier is
    /// resolved through the host before any reduction.
    fn fold(&mut self, incoming: Option<Op>) -> Result<(), EvalError> {
        if self.state == State::Ident {
            let (start, len) = self.last_ident;
            self.last_value = self.resolve_call(start, len, 0)?;
            self.state = State::Num;
        }

        let incoming_priority = incoming.map_or(0, Op::priority);
        loop {
            let op = match self.op_stack.peek() {
                Some(Frame::Op(op)) => *op,
                _ => break,
            };
            // power is right-associative: leave an equal-priority `**` alone
            if op == Op::Pow && incoming == Some(Op::Pow) {
                break;
            }
            if op.priority() < incoming_priority {
                break;
            }
            self.op_stack.pop();
            self.reduce(op)?;
        }
        Ok(())
    }

    /// Applies one popped operator to its operands.
    fn reduce(&mut self, op: Op) -> Result<(), EvalError> {
        let right = self.last_value;
        let left = if op.is_binary() {
            match self.value_stack.pop() {
                Some(value) => value,
                None => unreachable!("binary operator without a left operand"),
            }
        } else {
            right
        };

        if op == Op::Assign {
            let (start, len) = match self.op_stack.pop() {
                Some(Frame::Ident { start, len }) => (start, len),
                _ => unreachable!("assignment operator without its target"),
            };
            // a skipped assignment never reaches the host
            self.last_value = if self.skip_depth > 0 {
                0
            } else {
                self.resolve_assign(start, len, right)?
            };
            return Ok(());
        }

        let skipping = self.skip_depth > 0;

        // folding `&&`/`||` closes the suppression window its shift opened
        match op {
            Op::LogAnd if left == 0 => {
                debug_assert!(self.skip_depth > 0, "unbalanced short-circuit fold");
                self.skip_depth -= 1;
            }
            Op::LogOr if left != 0 => {
                debug_assert!(self.skip_depth > 0, "unbalanced short-circuit fold");
                self.skip_depth -= 1;
            }
            _ => {}
        }

        self.last_value = if !skipping {
            if op.is_binary() {
                operators::apply_binary(op, left, right)?
            } else {
                operators::apply_unary(op, right)?
            }
        } else {
            // only the short-circuit operators still do real work here
            match op {
                Op::LogAnd => (left != 0 && right != 0) as i32,
                Op::LogOr => (left != 0 || right != 0) as i32,
                _ => 0,
            }
        };
        Ok(())
    }

    // ----- host dispatch -----

    /// Resolves a call with `argc` arguments taken from the top of the value
    /// stack; `argc == 0` doubles as a bare identifier read.
    fn resolve_call(&mut self, start: usize, len: usize, argc: usize) -> Result<i32, EvalError> {
        let src = self.src;
        let host = match self.host.as_deref_mut() {
            Some(host) => host,
            None => return Err(EvalError::NullFunction),
        };
        if self.skip_depth > 0 {
            return Ok(0);
        }
        let name = ident_str(&src[start..start + len]);
        let args = self.value_stack.as_slice();
        let args = &args[args.len() - argc..];
        trace!(name, argc, "dispatching host call");
        let request = if argc == 0 {
            Request::Value
        } else {
            Request::Call(args)
        };
        Ok(host.call(name, request))
    }

    /// Dispatches a setter. The caller has already ruled out the skipped
    /// case.
    fn resolve_assign(&mut self, start: usize, len: usize, value: i32) -> Result<i32, EvalError> {
        let src = self.src;
        let host = match self.host.as_deref_mut() {
            Some(host) => host,
            None => return Err(EvalError::NullFunction),
        };
        let name = ident_str(&src[start..start + len]);
        trace!(name, value, "dispatching host assignment");
        Ok(host.call(name, Request::Assign(value)))
    }

    // ----- completion -----

    fn finish(mut self) -> Result<i32, EvalError> {
        match self.state {
            // empty statement: the last stored value stands
            State::Start => Ok(self.last_value),
            // a dangling operator has no operand to fold
            State::Binop(_) | State::Unop(_) => Err(EvalError::IncompleteExpression),
            _ => {
                self.fold(None)?;
                // only the bottom sentinel and the final operand barrier may
                // remain; anything more is an unclosed bracket or call
                if self.op_stack.len() > 2 {
                    return Err(EvalError::IncompleteExpression);
                }
                debug_assert!(
                    matches!(self.op_stack.peek(), Some(Frame::Start)),
                    "input folded down to a non-statement barrier"
                );
                debug_assert!(self.value_stack.is_empty(), "leftover operands");
                Ok(self.last_value)
            }
        }
    }

    // ----- stack helpers -----

    #[inline]
    fn push_frame(&mut self, frame: Frame) -> Result<(), EvalError> {
        self.op_stack
            .try_push(frame)
            .map_err(|_| EvalError::TooDeeplyNested)
    }

    #[inline]
    fn push_value(&mut self, value: i32) -> Result<(), EvalError> {
        self.value_stack
            .try_push(value)
            .map_err(|_| EvalError::TooDeeplyNested)
    }
}
