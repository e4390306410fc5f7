//! Target platforms for container images.

pub mod arch;

pub use arch::Architecture;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Container image platform (e.g. `linux/arm64`).
///
/// Lambda only runs Linux images, so the OS part is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Architecture,
}

impl Platform {
  pub const LINUX_AMD64: Platform = Platform::new(Architecture::X86_64);
  pub const LINUX_ARM64: Platform = Platform::new(Architecture::Arm64);

  pub const fn new(arch: Architecture) -> Self {
    Self { arch }
  }

  /// Returns the platform string passed to `docker build --platform`
  pub fn as_docker_platform(&self) -> String {
    format!("linux/{}", self.arch.docker_name())
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_docker_platform())
  }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported image platform '{0}' (expected linux/amd64 or linux/arm64)")]
pub struct ParsePlatformError(String);

impl FromStr for Platform {
  type Err = ParsePlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "linux/amd64" | "linux/x86_64" => Ok(Self::LINUX_AMD64),
      "linux/arm64" | "linux/aarch64" => Ok(Self::LINUX_ARM64),
      other => Err(ParsePlatformError(other.to_string())),
    }
  }
}

impl Serialize for Platform {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.as_docker_platform())
  }
}

impl<'de> Deserialize<'de> for Platform {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}
