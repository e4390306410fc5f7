//! CLI output formatting utilities.
//!
//! Templates and other data go to stdout so they can be piped; status lines
//! go to stderr with colored symbols.

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

use hello_lambda_lib::template::diff::Change;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ADD: &str = "+";
  pub const MODIFY: &str = "~";
  pub const REMOVE: &str = "-";
}

pub fn truncate_hash(hash: &str) -> &str {
  let len = hash.len().min(12);
  &hash[..len]
}

pub fn print_success(message: &str) {
  eprintln!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stderr, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  eprintln!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stderr, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  eprintln!(
    "  {}: {}",
    label.if_supports_color(Stream::Stderr, |s| s.dimmed()),
    value
  );
}

/// One line of a diff listing, e.g. `[+] AWS::Lambda::Url HelloFunctionFunctionUrl...`.
pub fn print_change(kind: &str, name: &str, change: &Change) {
  match change {
    Change::Added => println!(
      "[{}] {} {}",
      symbols::ADD.if_supports_color(Stream::Stdout, |s| s.green()),
      kind,
      name
    ),
    Change::Removed => println!(
      "[{}] {} {}",
      symbols::REMOVE.if_supports_color(Stream::Stdout, |s| s.red()),
      kind,
      name
    ),
    Change::Modified(fields) => println!(
      "[{}] {} {} ({})",
      symbols::MODIFY.if_supports_color(Stream::Stdout, |s| s.yellow()),
      kind,
      name,
      fields.join(", ")
    ),
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

pub fn print_yaml<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let yaml = serde_yaml::to_string(value).context("Failed to serialize to YAML")?;
  print!("{}", yaml);
  Ok(())
}
