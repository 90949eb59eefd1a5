//! Evaluation options.

/// What to do with tokens left over once a complete expression is parsed,
/// e.g. the stray `)` in `1+2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingPolicy {
  /// Fail with `EvalError::TrailingTokens`.
  #[default]
  Reject,
  /// Discard them and return the value of the leading expression.
  Ignore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalConfig {
  pub trailing: TrailingPolicy,
}

impl EvalConfig {
  /// Configuration that silently drops trailing tokens.
  pub fn lenient() -> Self {
    Self {
      trailing: TrailingPolicy::Ignore,
    }
  }
}
