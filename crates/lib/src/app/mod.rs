//! The application context: root of the construct tree.
//!
//! One [`App`] is created per process. It owns every stack, carries the
//! output directory and context values, and drives synthesis.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::AppConfig;
use crate::consts::{DEFAULT_OUTDIR, DEFAULT_QUALIFIER, QUALIFIER_CONTEXT_KEY};
use crate::stack::{ConstructError, Environment, Stack, StackProps};
use crate::synth::{CloudAssembly, SynthError, synthesize};

#[derive(Debug, Default, Clone)]
pub struct AppProps {
  /// Assembly directory; `cdk.out` when unset.
  pub outdir: Option<PathBuf>,
  pub context: BTreeMap<String, String>,
  /// Environment for stacks that do not set one; they stay
  /// environment-agnostic when unset.
  pub default_env: Option<Environment>,
}

#[derive(Debug)]
pub struct App {
  outdir: PathBuf,
  context: BTreeMap<String, String>,
  default_env: Option<Environment>,
  stacks: Vec<Stack>,
}

impl App {
  pub fn new(props: AppProps) -> Self {
    Self {
      outdir: props.outdir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTDIR)),
      context: props.context,
      default_env: props.default_env,
      stacks: Vec::new(),
    }
  }

  pub fn from_config(config: &AppConfig) -> Self {
    Self::new(AppProps {
      outdir: Some(config.outdir.clone()),
      context: config.context.clone(),
      default_env: config.default_env.clone(),
    })
  }

  pub fn outdir(&self) -> &Path {
    &self.outdir
  }

  pub fn context(&self, key: &str) -> Option<&str> {
    self.context.get(key).map(String::as_str)
  }

  /// Bootstrap qualifier for new stacks, overridable through context.
  pub fn qualifier(&self) -> &str {
    self.context(QUALIFIER_CONTEXT_KEY).unwrap_or(DEFAULT_QUALIFIER)
  }

  /// Create a stack named `id` and return it for construction.
  pub fn add_stack(&mut self, id: &str, props: StackProps) -> Result<&mut Stack, ConstructError> {
    if self.stack(id).is_some() {
      return Err(ConstructError::DuplicateId {
        scope: "App".to_string(),
        id: id.to_string(),
      });
    }

    let env = props.env.or_else(|| self.default_env.clone()).unwrap_or_default();
    let stack = Stack::new(id, env, props.description, self.qualifier())?;
    info!(stack = id, env = %stack.environment(), "created stack");

    self.stacks.push(stack);
    let index = self.stacks.len() - 1;
    Ok(&mut self.stacks[index])
  }

  /// Stacks in creation order.
  pub fn stacks(&self) -> &[Stack] {
    &self.stacks
  }

  pub fn stack(&self, id: &str) -> Option<&Stack> {
    self.stacks.iter().find(|s| s.id() == id)
  }

  /// Validate every stack and write the cloud assembly to [`App::outdir`].
  pub fn synth(&self) -> Result<CloudAssembly, SynthError> {
    synthesize(self)
  }
}
