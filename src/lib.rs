//! Crate root: wires together the evaluation pipeline.
//!
//! - `tokenizer` performs lexical analysis and settles unary vs. binary minus.
//! - `parser` walks the tokens with a recursive-descent grammar and folds
//!   the integer result on the way.
//! - `config` holds the knobs callers may turn.
//! - `error` defines the typed failures both stages report.

pub mod config;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use config::{EvalConfig, TrailingPolicy};
pub use error::{EvalError, EvalResult};

/// Evaluate an integer expression with the default configuration.
pub fn evaluate(expr: &str) -> EvalResult<i64> {
  evaluate_with(expr, &EvalConfig::default())
}

/// Evaluate an integer expression.
pub fn evaluate_with(expr: &str, config: &EvalConfig) -> EvalResult<i64> {
  let tokens = tokenizer::tokenize(expr)?;
  log::debug!("{} token(s) from {expr:?}", tokens.len());
  parser::evaluate(tokens, expr, config)
}
