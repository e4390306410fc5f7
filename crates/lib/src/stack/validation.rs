use std::fmt;

/// A check run against a construct at synthesis time.
///
/// Returns one message per problem; an empty list means the construct is valid.
pub trait Validation {
  fn validate(&self) -> Vec<String>;
}

impl<F> Validation for F
where
  F: Fn() -> Vec<String>,
{
  fn validate(&self) -> Vec<String> {
    self()
  }
}

/// A failed check, tagged with the construct path it was attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
  pub path: String,
  pub message: String,
}

impl ValidationError {
  pub fn new(path: String, message: String) -> Self {
    Self { path, message }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] {}", self.path, self.message)
  }
}
