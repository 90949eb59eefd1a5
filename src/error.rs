//! Error type shared by the tokenizer and the evaluator.
//!
//! Every failure carries the byte offset it was detected at, so the binary can
//! render the familiar two-line diagnostic with a caret under the offending
//! character.

use snafu::Snafu;
use std::num::ParseIntError;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EvalError {
  /// Nothing to evaluate: the input held no tokens at all.
  #[snafu(display("expression is empty"))]
  EmptyInput,

  /// An operator or bracket was consumed but no operand followed it.
  #[snafu(display("expected an operand"))]
  MissingOperand { loc: usize },

  /// An opening bracket was never closed.
  #[snafu(display("expected \")\""))]
  UnmatchedBracket { loc: usize },

  /// Brackets nested deeper than `parser::MAX_NESTING`.
  #[snafu(display("brackets nested too deeply"))]
  NestingTooDeep { loc: usize },

  #[snafu(display("division by zero"))]
  DivisionByZero { loc: usize },

  /// Tokens left over after a complete top-level expression.
  #[snafu(display("unexpected token after expression"))]
  TrailingTokens { loc: usize },

  #[snafu(display("integer overflow"))]
  Overflow { loc: usize },

  /// A digit run that does not fit in an `i64`.
  #[snafu(display("invalid number {text:?}: {source}"))]
  InvalidNumber {
    loc: usize,
    text: String,
    source: ParseIntError,
  },
}

impl EvalError {
  /// Byte offset in the source the error points at, if any.
  pub fn loc(&self) -> Option<usize> {
    match self {
      Self::EmptyInput => None,
      Self::MissingOperand { loc }
      | Self::UnmatchedBracket { loc }
      | Self::NestingTooDeep { loc }
      | Self::DivisionByZero { loc }
      | Self::TrailingTokens { loc }
      | Self::Overflow { loc }
      | Self::InvalidNumber { loc, .. } => Some(*loc),
    }
  }

  /// Render the error against the expression that produced it:
  ///
  /// ```text
  /// '1+'
  ///    ^ expected an operand
  /// ```
  pub fn report(&self, expr: &str) -> String {
    let safe_loc = self.loc().unwrap_or(0).min(expr.len());
    let char_offset = expr
      .get(..safe_loc)
      .map_or(safe_loc, |prefix| prefix.chars().count())
      + 1; // account for opening quote
    format!("'{expr}'\n{}^ {self}", " ".repeat(char_offset))
  }
}
