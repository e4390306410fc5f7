//! Construct tree behavior observable through the public API.

use std::time::Duration;

use hello_lambda_lib::lambda::{AssetImageCodeProps, DockerImageCode, DockerImageFunction, FunctionProps};
use hello_lambda_lib::{ConstructError, StackProps};
use tempfile::TempDir;

use super::common::{app_in, declare_public_function, image_context};

#[test]
fn logical_ids_are_stable_across_apps() {
  let ctx = image_context();
  let out = TempDir::new().unwrap();

  let mut first = app_in(&out);
  let (f1, u1) = declare_public_function(&mut first, "HelloLambdaStack", ctx.path());
  let mut second = app_in(&out);
  let (f2, u2) = declare_public_function(&mut second, "HelloLambdaStack", ctx.path());

  assert_eq!(f1.logical_id(), f2.logical_id());
  assert_eq!(u1.logical_id(), u2.logical_id());
  assert!(f1.logical_id().starts_with("HelloFunction"));
  assert_eq!(
    first.stack("HelloLambdaStack").unwrap().template(),
    second.stack("HelloLambdaStack").unwrap().template()
  );
}

#[test]
fn duplicate_function_id_is_rejected() {
  let ctx = image_context();
  let out = TempDir::new().unwrap();
  let mut app = app_in(&out);
  declare_public_function(&mut app, "S", ctx.path());

  let stack_props = StackProps::default();
  assert!(app.add_stack("S", stack_props).is_err());

  let stack = app.add_stack("Other", StackProps::default()).unwrap();
  let props = || FunctionProps::new(DockerImageCode::from_image_asset(ctx.path(), AssetImageCodeProps::default()));
  DockerImageFunction::new(stack, "Fn", props()).unwrap();
  let err = DockerImageFunction::new(stack, "Fn", props()).unwrap_err();
  assert!(matches!(err, ConstructError::DuplicateId { .. }));
}

#[test]
fn fingerprint_follows_content_not_timestamps() {
  let ctx = image_context();
  let out = TempDir::new().unwrap();
  let fingerprint = |app: &hello_lambda_lib::App| {
    app.stack("S").unwrap().assets().next().unwrap().fingerprint.clone()
  };

  let mut before = app_in(&out);
  declare_public_function(&mut before, "S", ctx.path());

  // Rewriting identical content only bumps the modification time.
  std::thread::sleep(Duration::from_millis(20));
  std::fs::write(ctx.path().join("src/main.rs"), "fn main() {}\n").unwrap();
  let mut touched = app_in(&out);
  declare_public_function(&mut touched, "S", ctx.path());
  assert_eq!(fingerprint(&before), fingerprint(&touched));

  std::fs::write(ctx.path().join("src/main.rs"), "fn main() { println!(\"hi\"); }\n").unwrap();
  let mut edited = app_in(&out);
  declare_public_function(&mut edited, "S", ctx.path());
  assert_ne!(fingerprint(&before), fingerprint(&edited));
}

#[test]
fn ignored_build_output_does_not_change_fingerprint() {
  let ctx = image_context();
  let out = TempDir::new().unwrap();

  let mut before = app_in(&out);
  declare_public_function(&mut before, "S", ctx.path());

  std::fs::create_dir_all(ctx.path().join("target/release")).unwrap();
  std::fs::write(ctx.path().join("target/release/bootstrap"), "binary").unwrap();
  let mut after = app_in(&out);
  declare_public_function(&mut after, "S", ctx.path());

  let fp = |app: &hello_lambda_lib::App| app.stack("S").unwrap().assets().next().unwrap().fingerprint.clone();
  assert_eq!(fp(&before), fp(&after));
}
