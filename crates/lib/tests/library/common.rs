//! Shared helpers for library integration tests.

use std::path::Path;
use std::time::Duration;

use hello_lambda_lib::lambda::{
  AssetImageCodeProps, DockerImageCode, DockerImageFunction, FunctionProps, FunctionUrl, FunctionUrlAuthType,
  FunctionUrlOptions,
};
use hello_lambda_lib::output::{CfnOutput, CfnOutputProps};
use hello_lambda_lib::platform::{Architecture, Platform};
use hello_lambda_lib::{App, AppProps, StackProps};
use tempfile::TempDir;

/// Build context with a Dockerfile and one source file.
pub fn image_context() -> TempDir {
  let temp = TempDir::new().unwrap();
  std::fs::create_dir_all(temp.path().join("src")).unwrap();
  std::fs::write(
    temp.path().join("Dockerfile"),
    "FROM public.ecr.aws/lambda/provided:al2023-arm64\n",
  )
  .unwrap();
  std::fs::write(temp.path().join("src/main.rs"), "fn main() {}\n").unwrap();
  temp
}

pub fn app_in(out: &TempDir) -> App {
  App::new(AppProps {
    outdir: Some(out.path().join("cdk.out")),
    ..AppProps::default()
  })
}

/// Declare the function + public URL + output trio used throughout the tests.
pub fn declare_public_function(app: &mut App, stack_id: &str, code_dir: &Path) -> (DockerImageFunction, FunctionUrl) {
  let stack = app.add_stack(stack_id, StackProps::default()).unwrap();
  let mut function = DockerImageFunction::new(
    stack,
    "HelloFunction",
    FunctionProps {
      architecture: Architecture::Arm64,
      memory_size: Some(128),
      timeout: Some(Duration::from_secs(10)),
      ..FunctionProps::new(DockerImageCode::from_image_asset(
        code_dir,
        AssetImageCodeProps {
          platform: Some(Platform::LINUX_ARM64),
        },
      ))
    },
  )
  .unwrap();
  let url = function
    .add_function_url(
      stack,
      FunctionUrlOptions {
        auth_type: FunctionUrlAuthType::None,
        ..Default::default()
      },
    )
    .unwrap();
  CfnOutput::new(stack, "FunctionUrl", CfnOutputProps::new(url.url())).unwrap();
  (function, url)
}
