//! Application configuration.
//!
//! Settings are resolved from defaults, then the environment the deploy
//! tooling sets when it runs the app, then explicit overrides (CLI flags):
//!
//! | Variable              | Setting                         |
//! |-----------------------|---------------------------------|
//! | `CDK_OUTDIR`          | assembly output directory       |
//! | `CDK_DEFAULT_ACCOUNT` | default stack account           |
//! | `CDK_DEFAULT_REGION`  | default stack region            |
//! | `CDK_CONTEXT_JSON`    | JSON object of context values   |

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::consts::{DEFAULT_OUTDIR, ENV_CONTEXT_JSON, ENV_DEFAULT_ACCOUNT, ENV_DEFAULT_REGION, ENV_OUTDIR};
use crate::stack::Environment;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("CDK_CONTEXT_JSON is not valid JSON: {0}")]
  InvalidContextJson(#[source] serde_json::Error),

  #[error("CDK_CONTEXT_JSON must be a JSON object")]
  ContextNotObject,

  #[error("invalid context '{0}': expected KEY=VALUE")]
  InvalidContextPair(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub outdir: PathBuf,
  pub context: BTreeMap<String, String>,
  /// Set only when both `CDK_DEFAULT_ACCOUNT` and `CDK_DEFAULT_REGION` are.
  pub default_env: Option<Environment>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      outdir: PathBuf::from(DEFAULT_OUTDIR),
      context: BTreeMap::new(),
      default_env: None,
    }
  }
}

impl AppConfig {
  /// Defaults overlaid with the `CDK_*` environment variables.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Some(outdir) = non_empty_var(ENV_OUTDIR) {
      config.outdir = PathBuf::from(outdir);
    }
    config.default_env = match (non_empty_var(ENV_DEFAULT_ACCOUNT), non_empty_var(ENV_DEFAULT_REGION)) {
      (Some(account), Some(region)) => Some(Environment::new(account, region)),
      (None, None) => None,
      (account, region) => {
        debug!(?account, ?region, "ignoring partial default environment");
        None
      }
    };

    if let Some(raw) = non_empty_var(ENV_CONTEXT_JSON) {
      config.context = parse_context_json(&raw)?;
    }

    debug!(
      outdir = %config.outdir.display(),
      env = ?config.default_env,
      context_keys = config.context.len(),
      "resolved app config"
    );
    Ok(config)
  }

  pub fn with_outdir(mut self, outdir: Option<PathBuf>) -> Self {
    if let Some(outdir) = outdir {
      self.outdir = outdir;
    }
    self
  }

  /// Apply `KEY=VALUE` overrides on top of the current context.
  pub fn with_context_pairs<S: AsRef<str>>(mut self, pairs: &[S]) -> Result<Self, ConfigError> {
    for pair in pairs {
      let (key, value) = parse_context_pair(pair.as_ref())?;
      self.context.insert(key, value);
    }
    Ok(self)
  }
}

/// Split `KEY=VALUE`; the key must be non-empty, the value may be.
pub fn parse_context_pair(pair: &str) -> Result<(String, String), ConfigError> {
  match pair.split_once('=') {
    Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
    _ => Err(ConfigError::InvalidContextPair(pair.to_string())),
  }
}

/// Parse a context object. Non-string values are kept as their JSON text.
fn parse_context_json(raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
  let value: Value = serde_json::from_str(raw).map_err(ConfigError::InvalidContextJson)?;
  let Value::Object(map) = value else {
    return Err(ConfigError::ContextNotObject);
  };

  Ok(
    map
      .into_iter()
      .map(|(k, v)| match v {
        Value::String(s) => (k, s),
        other => (k, other.to_string()),
      })
      .collect(),
  )
}

fn non_empty_var(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|v| !v.is_empty())
}
