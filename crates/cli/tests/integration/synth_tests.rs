//! Synth command integration tests: properties of the written assembly.

use serde_json::json;

use super::common::{STACK_ID, TestEnv, resources_of_type};

#[test]
fn exactly_one_function_and_one_url_referencing_it() {
  let env = TestEnv::new();
  env.synth();
  let template = env.template();

  let functions = resources_of_type(&template, "AWS::Lambda::Function");
  assert_eq!(functions.len(), 1);
  let (function_id, _) = functions[0];

  let urls = resources_of_type(&template, "AWS::Lambda::Url");
  assert_eq!(urls.len(), 1);
  assert_eq!(
    urls[0].1["Properties"]["TargetFunctionArn"],
    json!({ "Fn::GetAtt": [function_id, "Arn"] })
  );
}

#[test]
fn function_runs_on_arm64_with_fixed_limits() {
  let env = TestEnv::new();
  env.synth();
  let template = env.template();

  let (_, function) = resources_of_type(&template, "AWS::Lambda::Function")[0];
  let props = &function["Properties"];
  assert_eq!(props["Architectures"], json!(["arm64"]));
  assert_eq!(props["MemorySize"], json!(128));
  assert_eq!(props["Timeout"], json!(10));
  assert_eq!(props["PackageType"], json!("Image"));

  let assets = env.read_json(&format!("{}.assets.json", STACK_ID));
  let images = assets["dockerImages"].as_object().unwrap();
  assert_eq!(images.len(), 1);
  let (fingerprint, image) = images.iter().next().unwrap();
  assert_eq!(image["source"]["platform"], json!("linux/arm64"));
  assert!(env.outdir().join(format!("asset.{}", fingerprint)).join("Dockerfile").is_file());
}

#[test]
fn url_is_public() {
  let env = TestEnv::new();
  env.synth();
  let template = env.template();

  let (_, url) = resources_of_type(&template, "AWS::Lambda::Url")[0];
  assert_eq!(url["Properties"]["AuthType"], json!("NONE"));

  let permissions = resources_of_type(&template, "AWS::Lambda::Permission");
  assert_eq!(permissions.len(), 1);
  assert_eq!(permissions[0].1["Properties"]["Principal"], json!("*"));
}

#[test]
fn function_url_output_is_the_url_attribute() {
  let env = TestEnv::new();
  env.synth();
  let template = env.template();

  let outputs = template["Outputs"].as_object().unwrap();
  assert_eq!(outputs.len(), 1);
  let (url_id, _) = resources_of_type(&template, "AWS::Lambda::Url")[0];
  assert_eq!(
    outputs["FunctionUrl"]["Value"],
    json!({ "Fn::GetAtt": [url_id, "FunctionUrl"] })
  );
}

#[test]
fn resynthesis_is_byte_identical() {
  let env = TestEnv::new();
  let files = [
    "manifest.json".to_string(),
    "cdk.out".to_string(),
    format!("{}.template.json", STACK_ID),
    format!("{}.assets.json", STACK_ID),
  ];

  env.synth();
  let first: Vec<String> = files.iter().map(|f| env.read(f)).collect();
  env.synth();
  let second: Vec<String> = files.iter().map(|f| env.read(f)).collect();

  assert_eq!(first, second);
}

#[test]
fn qualifier_context_changes_bootstrap_names() {
  let env = TestEnv::new();
  env
    .hello_cmd()
    .args(["synth", "--quiet", "-c", "@aws-cdk/core:bootstrapQualifier=custom42"])
    .assert()
    .success();

  let template = env.template();
  assert_eq!(
    template["Parameters"]["BootstrapVersion"]["Default"],
    json!("/cdk-bootstrap/custom42/version")
  );
}

#[test]
fn manifest_lists_stack_and_assets_artifacts() {
  let env = TestEnv::new();
  env.synth();

  let manifest = env.read_json("manifest.json");
  let stack = &manifest["artifacts"][STACK_ID];
  assert_eq!(stack["type"], json!("aws:cloudformation:stack"));
  assert_eq!(stack["environment"], json!("aws://unknown-account/unknown-region"));
  assert_eq!(stack["dependencies"], json!([format!("{}.assets", STACK_ID)]));
  assert_eq!(
    manifest["artifacts"][format!("{}.assets", STACK_ID)]["type"],
    json!("cdk:asset-manifest")
  );
}
