//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The only real decision made here is whether a `-` is a binary subtraction
//! or a unary minus. That is settled by looking at the previously emitted
//! token, never at the previous character, so whitespace and dropped
//! characters have no effect on it.

use std::fmt;

use log::trace;
use snafu::ResultExt;

use crate::error::{EvalResult, InvalidNumberSnafu};

/// Binding levels reported by [`TokenKind::precedence`], loosest first.
pub const ADD_SUB: u8 = 1;
pub const MUL_DIV: u8 = 2;
pub const UNARY: u8 = 3;

/// Kinds of tokens recognised by the front-end. Only numbers carry a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Num(i64),
  Add,
  Sub,
  Mul,
  Div,
  UnaryMinus,
  OpenBracket,
  CloseBracket,
}

impl TokenKind {
  /// Binding strength of an operator, tighter binding is higher.
  /// Operands and brackets have none.
  pub fn precedence(self) -> Option<u8> {
    match self {
      Self::Add | Self::Sub => Some(ADD_SUB),
      Self::Mul | Self::Div => Some(MUL_DIV),
      Self::UnaryMinus => Some(UNARY),
      Self::Num(_) | Self::OpenBracket | Self::CloseBracket => None,
    }
  }

  /// True for the kinds after which a `-` must be a unary minus.
  fn expects_operand(self) -> bool {
    matches!(
      self,
      Self::OpenBracket | Self::Add | Self::Sub | Self::Mul | Self::Div | Self::UnaryMinus
    )
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Num(value) => write!(f, "{value}"),
      Self::Add => f.write_str("+"),
      Self::Sub => f.write_str("-"),
      Self::Mul => f.write_str("*"),
      Self::Div => f.write_str("/"),
      Self::UnaryMinus => f.write_str("-"),
      Self::OpenBracket => f.write_str("("),
      Self::CloseBracket => f.write_str(")"),
    }
  }
}

/// A token plus the byte offset it starts at in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: usize,
}

impl Token {
  pub fn new(kind: TokenKind, loc: usize) -> Self {
    Self { kind, loc }
  }
}

/// Lex the input into a flat vector of tokens.
///
/// Whitespace and any character outside the grammar are dropped silently. The
/// only failure is a digit run too large for an `i64`.
pub fn tokenize(input: &str) -> EvalResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let mut prev: Option<TokenKind> = None;
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    let start = i;

    let kind = match c {
      b'0'..=b'9' => {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
          i += 1;
        }
        let text = &input[start..i];
        let value = text
          .parse::<i64>()
          .context(InvalidNumberSnafu { loc: start, text })?;
        TokenKind::Num(value)
      }
      b'-' => {
        i += 1;
        if prev.is_none_or(TokenKind::expects_operand) {
          TokenKind::UnaryMinus
        } else {
          TokenKind::Sub
        }
      }
      b'+' | b'*' | b'/' | b'(' | b')' => {
        i += 1;
        match c {
          b'+' => TokenKind::Add,
          b'*' => TokenKind::Mul,
          b'/' => TokenKind::Div,
          b'(' => TokenKind::OpenBracket,
          _ => TokenKind::CloseBracket,
        }
      }
      _ => {
        // Skip the whole character so multi-byte input never splits.
        i += input[i..].chars().next().map_or(1, char::len_utf8);
        continue;
      }
    };

    trace!("token {kind:?} at {start}");
    tokens.push(Token::new(kind, start));
    prev = Some(kind);
  }

  Ok(tokens)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::EvalError;

  fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
      .unwrap()
      .into_iter()
      .map(|token| token.kind)
      .collect()
  }

  #[test]
  fn scans_operators_and_numbers() {
    use TokenKind::*;
    assert_eq!(
      kinds("12+3*(4/5)"),
      vec![
        Num(12),
        Add,
        Num(3),
        Mul,
        OpenBracket,
        Num(4),
        Div,
        Num(5),
        CloseBracket
      ]
    );
  }

  #[test]
  fn leading_minus_is_unary() {
    assert_eq!(kinds("-1"), vec![TokenKind::UnaryMinus, TokenKind::Num(1)]);
  }

  #[test]
  fn minus_after_operand_is_binary() {
    use TokenKind::*;
    assert_eq!(kinds("3-1"), vec![Num(3), Sub, Num(1)]);
    assert_eq!(kinds("(3)-1"), vec![OpenBracket, Num(3), CloseBracket, Sub, Num(1)]);
  }

  #[test]
  fn minus_after_operator_or_bracket_is_unary() {
    use TokenKind::*;
    assert_eq!(kinds("2*-3"), vec![Num(2), Mul, UnaryMinus, Num(3)]);
    assert_eq!(kinds("5--3"), vec![Num(5), Sub, UnaryMinus, Num(3)]);
    assert_eq!(kinds("(-3"), vec![OpenBracket, UnaryMinus, Num(3)]);
    assert_eq!(kinds("--5"), vec![UnaryMinus, UnaryMinus, Num(5)]);
  }

  #[test]
  fn lookback_ignores_dropped_characters() {
    use TokenKind::*;
    // The `x` is dropped, so the previous emitted token is still `3`.
    assert_eq!(kinds("3 x - 1"), vec![Num(3), Sub, Num(1)]);
    assert_eq!(kinds("+ ? -1"), vec![Add, UnaryMinus, Num(1)]);
  }

  #[test]
  fn skips_whitespace_and_unknown_characters() {
    use TokenKind::*;
    assert_eq!(kinds(" 1 \t+ a2é "), vec![Num(1), Add, Num(2)]);
    assert!(kinds("abc").is_empty());
  }

  #[test]
  fn records_locations() {
    let tokens = tokenize(" 123 + 4").unwrap();
    assert_eq!(tokens[0], Token::new(TokenKind::Num(123), 1));
    assert_eq!(tokens[1], Token::new(TokenKind::Add, 5));
    assert_eq!(tokens[2], Token::new(TokenKind::Num(4), 7));
  }

  #[test]
  fn oversized_number_is_an_error() {
    let err = tokenize("1 + 99999999999999999999").unwrap_err();
    assert!(matches!(
      err,
      EvalError::InvalidNumber { loc: 4, ref text, .. } if text == "99999999999999999999"
    ));
  }

  #[test]
  fn precedence_orders_operators() {
    assert!(TokenKind::Add.precedence() < TokenKind::Mul.precedence());
    assert!(TokenKind::Mul.precedence() < TokenKind::UnaryMinus.precedence());
    assert_eq!(TokenKind::Sub.precedence(), TokenKind::Add.precedence());
    assert_eq!(TokenKind::Div.precedence(), Some(MUL_DIV));
    assert_eq!(TokenKind::OpenBracket.precedence(), None);
  }
}
