use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Map, Value, json};

use super::code::DockerImageCode;
use super::url::{FunctionUrl, FunctionUrlOptions};
use crate::assets::DockerImageAsset;
use crate::consts::{LAMBDA_MAX_MEMORY_MB, LAMBDA_MAX_TIMEOUT_SECS, LAMBDA_MIN_MEMORY_MB};
use crate::platform::{Architecture, Platform};
use crate::stack::{ConstructError, Stack};
use crate::template::{Resource, intrinsic};

const DEFAULT_MEMORY_MB: u32 = 128;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

pub struct FunctionProps {
  pub code: DockerImageCode,
  pub architecture: Architecture,
  /// Megabytes; 128 when unset.
  pub memory_size: Option<u32>,
  /// Three seconds when unset.
  pub timeout: Option<Duration>,
  pub description: Option<String>,
  pub environment: BTreeMap<String, String>,
}

impl FunctionProps {
  /// Props with the service defaults: x86_64, 128 MB, 3 seconds.
  pub fn new(code: DockerImageCode) -> Self {
    Self {
      code,
      architecture: Architecture::X86_64,
      memory_size: None,
      timeout: None,
      description: None,
      environment: BTreeMap::new(),
    }
  }
}

/// A Lambda function packaged as a container image.
///
/// Expands to an execution role and an `AWS::Lambda::Function`, and registers
/// the image build context as an asset of the stack.
#[derive(Debug, Clone)]
pub struct DockerImageFunction {
  stack_id: String,
  node_id: String,
  logical_id: String,
  role_logical_id: String,
  architecture: Architecture,
  has_url: bool,
}

impl DockerImageFunction {
  pub fn new(stack: &mut Stack, id: &str, props: FunctionProps) -> Result<Self, ConstructError> {
    let role_scope = format!("{}/ServiceRole", id);
    let role_path = format!("{}/Resource", role_scope);
    let function_path = format!("{}/Resource", id);

    // Everything that can fail runs before the stack is touched
    stack.check_path(id)?;
    stack.check_path(&role_scope)?;
    stack.check_resource_path(&role_path)?;
    stack.check_resource_path(&function_path)?;

    let memory_size = props.memory_size.unwrap_or(DEFAULT_MEMORY_MB);
    let timeout = props.timeout.unwrap_or(DEFAULT_TIMEOUT);
    let platform = props
      .code
      .platform()
      .unwrap_or(Platform::new(props.architecture));
    let asset = DockerImageAsset::new(props.code.directory(), platform)?;

    stack.claim_path(id)?;
    stack.claim_path(&role_scope)?;
    let role_logical_id = stack.add_resource(&role_path, Resource::new("AWS::IAM::Role", execution_role_properties()))?;

    let mut properties = json!({
      "Architectures": [props.architecture.as_str()],
      "Code": { "ImageUri": asset.image_uri(stack.qualifier()) },
      "MemorySize": memory_size,
      "PackageType": "Image",
      "Role": intrinsic::get_att(&role_logical_id, "Arn"),
      "Timeout": timeout.as_secs(),
    });
    if let Some(description) = &props.description {
      properties["Description"] = json!(description);
    }
    if !props.environment.is_empty() {
      let variables: Map<String, Value> = props
        .environment
        .iter()
        .map(|(k, v)| (k.clone(), json!(v)))
        .collect();
      properties["Environment"] = json!({ "Variables": variables });
    }

    let logical_id = stack.add_resource(
      &function_path,
      Resource::new("AWS::Lambda::Function", properties).depends_on(&role_logical_id),
    )?;

    let architecture = props.architecture;
    stack.add_validation(id, move || {
      let mut errors = Vec::new();
      if platform.arch != architecture {
        errors.push(format!(
          "image platform {} does not match function architecture {}",
          platform, architecture
        ));
      }
      if !(LAMBDA_MIN_MEMORY_MB..=LAMBDA_MAX_MEMORY_MB).contains(&memory_size) {
        errors.push(format!(
          "memory size must be between {} and {} MB, got {}",
          LAMBDA_MIN_MEMORY_MB, LAMBDA_MAX_MEMORY_MB, memory_size
        ));
      }
      if timeout.subsec_nanos() != 0 {
        errors.push(format!("timeout must be a whole number of seconds, got {:?}", timeout));
      } else if !(1..=LAMBDA_MAX_TIMEOUT_SECS).contains(&timeout.as_secs()) {
        errors.push(format!(
          "timeout must be between 1 and {} seconds, got {}",
          LAMBDA_MAX_TIMEOUT_SECS,
          timeout.as_secs()
        ));
      }
      errors
    });
    stack.add_asset(asset);

    Ok(Self {
      stack_id: stack.id().to_string(),
      node_id: id.to_string(),
      logical_id,
      role_logical_id,
      architecture,
      has_url: false,
    })
  }

  /// Add a URL endpoint for this function.
  ///
  /// A function can have a single URL; calling this twice is an error.
  pub fn add_function_url(&mut self, stack: &mut Stack, options: FunctionUrlOptions) -> Result<FunctionUrl, ConstructError> {
    if self.has_url {
      return Err(ConstructError::FunctionUrlExists {
        function: format!("{}/{}", self.stack_id, self.node_id),
      });
    }
    let url = FunctionUrl::new(stack, self, options)?;
    self.has_url = true;
    Ok(url)
  }

  pub(crate) fn stack_id(&self) -> &str {
    &self.stack_id
  }

  pub fn node_id(&self) -> &str {
    &self.node_id
  }

  pub fn logical_id(&self) -> &str {
    &self.logical_id
  }

  pub fn architecture(&self) -> Architecture {
    self.architecture
  }

  pub fn function_arn(&self) -> Value {
    intrinsic::get_att(&self.logical_id, "Arn")
  }

  pub fn function_name(&self) -> Value {
    intrinsic::reference(&self.logical_id)
  }

  pub fn role_arn(&self) -> Value {
    intrinsic::get_att(&self.role_logical_id, "Arn")
  }
}

fn execution_role_properties() -> Value {
  json!({
    "AssumeRolePolicyDocument": {
      "Statement": [{
        "Action": "sts:AssumeRole",
        "Effect": "Allow",
        "Principal": { "Service": "lambda.amazonaws.com" }
      }],
      "Version": "2012-10-17"
    },
    "ManagedPolicyArns": [
      intrinsic::join("", vec![
        json!("arn:"),
        intrinsic::reference(intrinsic::PARTITION),
        json!(":iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"),
      ])
    ]
  })
}
