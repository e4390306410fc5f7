use std::fmt;

use serde::{Deserialize, Serialize};

/// Instruction set a function runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
  #[serde(rename = "x86_64")]
  X86_64,
  #[serde(rename = "arm64")]
  Arm64,
}

impl Architecture {
  /// Identifier used in a function's `Architectures` property
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Arm64 => "arm64",
    }
  }

  /// Identifier used in container platform strings (`linux/<arch>`)
  pub fn docker_name(&self) -> &'static str {
    match self {
      Self::X86_64 => "amd64",
      Self::Arm64 => "arm64",
    }
  }
}

impl fmt::Display for Architecture {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
