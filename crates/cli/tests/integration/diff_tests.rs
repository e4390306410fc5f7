//! Diff command integration tests.

use predicates::prelude::*;

use super::common::{STACK_ID, TestEnv};

#[test]
fn diff_after_synth_has_no_differences() {
  let env = TestEnv::new();
  env.synth();

  env
    .hello_cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("There were no differences"))
    .stderr(predicate::str::contains("Number of changes: 0"));
}

#[test]
fn diff_reports_modified_properties() {
  let env = TestEnv::new();
  env.synth();

  // Simulate an older deployment with a different memory size.
  let path = env.outdir().join(format!("{}.template.json", STACK_ID));
  let edited = env.read(&format!("{}.template.json", STACK_ID)).replace("\"MemorySize\": 128", "\"MemorySize\": 256");
  std::fs::write(&path, edited).unwrap();

  env
    .hello_cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("[~] AWS::Lambda::Function"))
    .stdout(predicate::str::contains("MemorySize"));
}

#[test]
fn diff_json_counts_changes() {
  let env = TestEnv::new();

  let output = env.hello_cmd().args(["diff", "--json"]).output().unwrap();
  assert!(output.status.success());

  let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(entries[0]["stack"], STACK_ID);
  assert_eq!(entries[0]["previous"], false);
  assert!(entries[0]["changes"].as_u64().unwrap() > 0);
}

#[test]
fn diff_does_not_write_the_assembly() {
  let env = TestEnv::new();
  env.hello_cmd().arg("diff").assert().success();
  assert!(!env.outdir().join("manifest.json").exists());
}

#[test]
fn diff_names_the_type_of_removed_resources() {
  let env = TestEnv::new();
  env.synth();

  // Simulate an older deployment that also had a topic.
  let name = format!("{}.template.json", STACK_ID);
  let mut template: serde_json::Value = serde_json::from_str(&env.read(&name)).unwrap();
  template["Resources"]["OldTopic"] = serde_json::json!({ "Type": "AWS::SNS::Topic" });
  std::fs::write(env.outdir().join(&name), serde_json::to_string_pretty(&template).unwrap()).unwrap();

  env
    .hello_cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("[-] AWS::SNS::Topic OldTopic"));
}
