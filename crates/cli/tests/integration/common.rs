//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

pub const STACK_ID: &str = "HelloLambdaStack";

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the cloud assembly.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Assembly directory (isolated per test).
  pub fn outdir(&self) -> PathBuf {
    let p = self.temp.path().join("cdk.out");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Get a pre-configured Command for the hello-lambda binary.
  ///
  /// Points `CDK_OUTDIR` at the isolated assembly directory and clears the
  /// other deploy tooling variables.
  pub fn hello_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("hello-lambda");
    cmd.env("CDK_OUTDIR", self.outdir());
    cmd.env_remove("CDK_DEFAULT_ACCOUNT");
    cmd.env_remove("CDK_DEFAULT_REGION");
    cmd.env_remove("CDK_CONTEXT_JSON");
    cmd
  }

  /// Run `synth --quiet` and assert it succeeded.
  pub fn synth(&self) {
    self.hello_cmd().args(["synth", "--quiet"]).assert().success();
  }

  /// Read a file from the assembly directory.
  pub fn read(&self, name: &str) -> String {
    let path = self.outdir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
  }

  /// Read a JSON file from the assembly directory.
  pub fn read_json(&self, name: &str) -> Value {
    serde_json::from_str(&self.read(name)).unwrap()
  }

  pub fn template(&self) -> Value {
    self.read_json(&format!("{}.template.json", STACK_ID))
  }
}

/// Logical ids of all resources of `resource_type`.
pub fn resources_of_type<'a>(template: &'a Value, resource_type: &str) -> Vec<(&'a String, &'a Value)> {
  template["Resources"]
    .as_object()
    .unwrap()
    .iter()
    .filter(|(_, r)| r["Type"] == resource_type)
    .collect()
}
