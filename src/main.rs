use std::io::{self, BufRead};
use std::process;

use clap::Parser;
use rcalc::tokenizer::tokenize;
use rcalc::{EvalConfig, EvalResult, TrailingPolicy, evaluate_with};

/// Evaluate integer arithmetic expressions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
  /// Expressions to evaluate; read from stdin, one per line, when omitted
  exprs: Vec<String>,

  /// Ignore tokens left over after a complete expression
  #[arg(long)]
  allow_trailing: bool,

  /// Print the token sequence instead of evaluating
  #[arg(long)]
  tokens: bool,
}

fn run(expr: &str, args: &Args, config: &EvalConfig) -> EvalResult<String> {
  if args.tokens {
    let tokens = tokenize(expr)?;
    let kinds: Vec<String> = tokens
      .iter()
      .map(|token| format!("{:?}", token.kind))
      .collect();
    return Ok(kinds.join(" "));
  }
  evaluate_with(expr, config).map(|value| value.to_string())
}

fn main() {
  env_logger::init();

  let args = Args::parse();
  let config = EvalConfig {
    trailing: if args.allow_trailing {
      TrailingPolicy::Ignore
    } else {
      TrailingPolicy::Reject
    },
  };

  let exprs = if args.exprs.is_empty() {
    match io::stdin().lock().lines().collect::<io::Result<Vec<_>>>() {
      Ok(lines) => lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect(),
      Err(err) => {
        eprintln!("failed to read stdin: {err}");
        process::exit(1);
      }
    }
  } else {
    args.exprs.clone()
  };

  let mut failed = false;
  for expr in &exprs {
    match run(expr, &args, &config) {
      Ok(output) => println!("{output}"),
      Err(err) => {
        eprintln!("{}", err.report(expr));
        failed = true;
      }
    }
  }

  if failed {
    process::exit(1);
  }
}
