//! End-to-end synthesis through `App::synth`.

use serde_json::{Value, json};
use tempfile::TempDir;

use hello_lambda_lib::SynthError;
use hello_lambda_lib::lambda::{AssetImageCodeProps, DockerImageCode, DockerImageFunction, FunctionProps};
use hello_lambda_lib::platform::{Architecture, Platform};
use hello_lambda_lib::StackProps;

use super::common::{app_in, declare_public_function, image_context};

fn read_json(path: std::path::PathBuf) -> Value {
  serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn synthesized_template_matches_declaration() {
  let ctx = image_context();
  let out = TempDir::new().unwrap();
  let mut app = app_in(&out);
  let (function, url) = declare_public_function(&mut app, "HelloLambdaStack", ctx.path());

  let assembly = app.synth().unwrap();
  let artifact = assembly.stack("HelloLambdaStack").unwrap();
  let on_disk = read_json(artifact.template_path.clone());

  assert_eq!(on_disk, serde_json::to_value(&artifact.template).unwrap());
  assert_eq!(
    on_disk["Resources"][url.logical_id()]["Properties"]["TargetFunctionArn"],
    json!({ "Fn::GetAtt": [function.logical_id(), "Arn"] })
  );
  assert_eq!(
    on_disk["Outputs"]["FunctionUrl"]["Value"],
    json!({ "Fn::GetAtt": [url.logical_id(), "FunctionUrl"] })
  );
  assert!(on_disk["Rules"]["CheckBootstrapVersion"].is_object());
}

#[test]
fn all_validation_errors_are_reported_together() {
  let ctx = image_context();
  let out = TempDir::new().unwrap();
  let mut app = app_in(&out);
  let stack = app.add_stack("S", StackProps::default()).unwrap();

  DockerImageFunction::new(
    stack,
    "Bad",
    FunctionProps {
      architecture: Architecture::X86_64,
      memory_size: Some(64),
      timeout: Some(std::time::Duration::from_secs(901)),
      ..FunctionProps::new(DockerImageCode::from_image_asset(
        ctx.path(),
        AssetImageCodeProps {
          platform: Some(Platform::LINUX_ARM64),
        },
      ))
    },
  )
  .unwrap();

  let Err(SynthError::Validation(errors)) = app.synth() else {
    panic!("expected validation failure");
  };
  assert_eq!(errors.len(), 3);
  assert!(errors.iter().all(|e| e.path == "S/Bad"));
  assert!(!app.outdir().exists());
}

#[test]
fn empty_stack_fails_synthesis() {
  let out = TempDir::new().unwrap();
  let mut app = app_in(&out);
  app.add_stack("Empty", StackProps::default()).unwrap();

  let err = app.synth().unwrap_err();
  assert!(err.to_string().contains("[Empty] stack declares no resources"));
}
