//! Recursive-descent evaluator.
//!
//! The grammar has five levels, loosest binding first:
//!
//! ```text
//! expr    = add
//! add     = mul (("+" | "-") mul)*
//! mul     = unary (("*" | "/") unary)*
//! unary   = "-"* primary
//! primary = num | "(" expr ")"
//! ```
//!
//! Values are folded while descending, so no tree is built. Each level returns
//! `Ok(None)` when the input is already exhausted where it would start; the
//! caller decides whether that is fine (end of input) or an error (an
//! operator was consumed and its operand never came).
//!
//! Only brackets make the evaluator recurse, and their depth is capped at
//! [`MAX_NESTING`], so stack use stays bounded whatever the input.

use log::{debug, trace};
use snafu::{OptionExt, ensure};

use crate::config::{EvalConfig, TrailingPolicy};
use crate::error::{
  DivisionByZeroSnafu, EmptyInputSnafu, EvalResult, MissingOperandSnafu, NestingTooDeepSnafu,
  OverflowSnafu, TrailingTokensSnafu, UnmatchedBracketSnafu,
};
use crate::tokenizer::{ADD_SUB, MUL_DIV, Token, TokenKind};

/// Deepest bracket nesting accepted before failing with `NestingTooDeep`.
pub const MAX_NESTING: usize = 256;

type Level = fn(&mut TokenStream) -> EvalResult<Option<i64>>;

/// Evaluate a token sequence produced from `source`.
pub fn evaluate(tokens: Vec<Token>, source: &str, config: &EvalConfig) -> EvalResult<i64> {
  let mut stream = TokenStream::new(tokens, source);

  let value = parse_expr(&mut stream)?.context(EmptyInputSnafu)?;

  if let Some(token) = stream.peek() {
    match config.trailing {
      TrailingPolicy::Reject => return TrailingTokensSnafu { loc: token.loc }.fail(),
      TrailingPolicy::Ignore => {
        debug!("ignoring {} trailing token(s)", stream.remaining());
      }
    }
  }

  debug!("{source:?} = {value}");
  Ok(value)
}

fn parse_expr(stream: &mut TokenStream) -> EvalResult<Option<i64>> {
  parse_add(stream)
}

fn parse_add(stream: &mut TokenStream) -> EvalResult<Option<i64>> {
  fold_binary(stream, ADD_SUB, parse_mul)
}

fn parse_mul(stream: &mut TokenStream) -> EvalResult<Option<i64>> {
  fold_binary(stream, MUL_DIV, parse_unary)
}

/// Parse `next (op next)*` for every binary operator whose precedence is
/// `level`, folding left to right.
fn fold_binary(stream: &mut TokenStream, level: u8, next: Level) -> EvalResult<Option<i64>> {
  let Some(mut lhs) = next(stream)? else {
    return Ok(None);
  };

  while let Some(op) = stream
    .peek()
    .copied()
    .filter(|token| token.kind.precedence() == Some(level))
  {
    stream.advance();
    let rhs = next(stream)?.context(MissingOperandSnafu {
      loc: stream.end_loc(),
    })?;
    let value = apply(op, lhs, rhs)?;
    trace!("{lhs} {} {rhs} = {value}", op.kind);
    lhs = value;
  }

  Ok(Some(lhs))
}

fn apply(op: Token, lhs: i64, rhs: i64) -> EvalResult<i64> {
  let value = match op.kind {
    TokenKind::Add => lhs.checked_add(rhs),
    TokenKind::Sub => lhs.checked_sub(rhs),
    TokenKind::Mul => lhs.checked_mul(rhs),
    TokenKind::Div => {
      ensure!(rhs != 0, DivisionByZeroSnafu { loc: op.loc });
      lhs.checked_div(rhs)
    }
    // `fold_binary` only hands over ADD_SUB and MUL_DIV operators.
    kind => unreachable!("{kind:?} is not a binary operator"),
  };
  value.context(OverflowSnafu { loc: op.loc })
}

fn parse_unary(stream: &mut TokenStream) -> EvalResult<Option<i64>> {
  if stream.peek().is_none() {
    return Ok(None);
  }

  let mut innermost = None;
  let mut negations = 0usize;
  while let Some(token) = stream
    .peek()
    .copied()
    .filter(|token| token.kind == TokenKind::UnaryMinus)
  {
    stream.advance();
    innermost = Some(token.loc);
    negations += 1;
  }

  let operand = parse_primary(stream)?;
  let Some(loc) = innermost else {
    return Ok(Some(operand));
  };

  // The innermost minus is applied first and is the only one that can
  // overflow; after it the sign just alternates.
  let negated = operand.checked_neg().context(OverflowSnafu { loc })?;
  trace!("{negations} unary minus(es) on {operand}");
  Ok(Some(if negations % 2 == 1 { negated } else { operand }))
}

fn parse_primary(stream: &mut TokenStream) -> EvalResult<i64> {
  if let Some(value) = stream.get_number() {
    return Ok(value);
  }

  if let Some(value) = parse_brackets(stream)? {
    return Ok(value);
  }

  MissingOperandSnafu {
    loc: stream.end_loc(),
  }
  .fail()
}

fn parse_brackets(stream: &mut TokenStream) -> EvalResult<Option<i64>> {
  let Some(open) = stream
    .peek()
    .copied()
    .filter(|token| token.kind == TokenKind::OpenBracket)
  else {
    return Ok(None);
  };

  ensure!(stream.depth < MAX_NESTING, NestingTooDeepSnafu { loc: open.loc });
  stream.advance();
  stream.depth += 1;

  let value = parse_expr(stream)?.context(MissingOperandSnafu {
    loc: stream.end_loc(),
  })?;

  ensure!(
    stream.equal(TokenKind::CloseBracket),
    UnmatchedBracketSnafu {
      loc: stream.end_loc(),
    }
  );
  stream.depth -= 1;
  Ok(Some(value))
}

/// Lightweight cursor over the token vector. The position only moves forward
/// and may sit one past the last token once everything is consumed.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
  /// Brackets currently open.
  depth: usize,
}

impl<'a> TokenStream<'a> {
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
      depth: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn advance(&mut self) {
    if self.pos < self.tokens.len() {
      self.pos += 1;
    }
  }

  /// Consume the current token if it is of the given kind.
  fn equal(&mut self, kind: TokenKind) -> bool {
    if self.peek().is_some_and(|token| token.kind == kind) {
      self.advance();
      return true;
    }
    false
  }

  /// Consume the current token if it is a number, returning its value.
  fn get_number(&mut self) -> Option<i64> {
    let TokenKind::Num(value) = self.peek()?.kind else {
      return None;
    };
    self.advance();
    Some(value)
  }

  /// Location of the current token, or the end of the source once exhausted.
  fn end_loc(&self) -> usize {
    self.peek().map_or(self.source.len(), |token| token.loc)
  }

  fn remaining(&self) -> usize {
    self.tokens.len() - self.pos
  }
}
