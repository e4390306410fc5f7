//! The `HelloLambdaStack` definition.
//!
//! One container-image function built from `lambda/`, reachable through a
//! public function URL whose address is exported as `FunctionUrl`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hello_lambda_lib::App;
use hello_lambda_lib::lambda::{
  AssetImageCodeProps, DockerImageCode, DockerImageFunction, FunctionProps, FunctionUrl, FunctionUrlAuthType,
  FunctionUrlOptions,
};
use hello_lambda_lib::output::{CfnOutput, CfnOutputProps};
use hello_lambda_lib::platform::{Architecture, Platform};
use hello_lambda_lib::stack::{ConstructError, StackProps};

pub const STACK_ID: &str = "HelloLambdaStack";

const FUNCTION_ID: &str = "HelloFunction";
const OUTPUT_ID: &str = "FunctionUrl";
const MEMORY_MB: u32 = 128;
const TIMEOUT: Duration = Duration::from_secs(10);

/// The image build context shipped next to this crate.
pub fn lambda_dir() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("lambda")
}

#[derive(Debug)]
pub struct HelloLambdaStack {
  pub function: DockerImageFunction,
  pub url: FunctionUrl,
  pub output: CfnOutput,
}

impl HelloLambdaStack {
  pub fn new(app: &mut App, id: &str) -> Result<Self, ConstructError> {
    Self::from_code_dir(app, id, &lambda_dir())
  }

  pub fn from_code_dir(app: &mut App, id: &str, code_dir: &Path) -> Result<Self, ConstructError> {
    let stack = app.add_stack(id, StackProps::default())?;

    let code = DockerImageCode::from_image_asset(
      code_dir,
      AssetImageCodeProps {
        platform: Some(Platform::LINUX_ARM64),
      },
    );
    let mut function = DockerImageFunction::new(
      stack,
      FUNCTION_ID,
      FunctionProps {
        architecture: Architecture::Arm64,
        memory_size: Some(MEMORY_MB),
        timeout: Some(TIMEOUT),
        ..FunctionProps::new(code)
      },
    )?;

    let url = function.add_function_url(
      stack,
      FunctionUrlOptions {
        auth_type: FunctionUrlAuthType::None,
        ..Default::default()
      },
    )?;

    let output = CfnOutput::new(stack, OUTPUT_ID, CfnOutputProps::new(url.url()))?;

    Ok(Self { function, url, output })
  }
}
