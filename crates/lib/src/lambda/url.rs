use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::function::DockerImageFunction;
use crate::stack::{ConstructError, Stack};
use crate::template::{Resource, intrinsic};

/// Who may invoke a function URL.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionUrlAuthType {
  /// Callers must sign requests with IAM credentials.
  #[default]
  AwsIam,
  /// Anyone with the URL may invoke the function.
  None,
}

impl FunctionUrlAuthType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::AwsIam => "AWS_IAM",
      Self::None => "NONE",
    }
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvokeMode {
  #[default]
  Buffered,
  ResponseStream,
}

impl InvokeMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Buffered => "BUFFERED",
      Self::ResponseStream => "RESPONSE_STREAM",
    }
  }
}

#[derive(Debug, Default, Clone)]
pub struct FunctionUrlOptions {
  pub auth_type: FunctionUrlAuthType,
  /// Left out of the template when unset, which the service treats as buffered.
  pub invoke_mode: Option<InvokeMode>,
}

/// A dedicated HTTPS endpoint for one function.
#[derive(Debug, Clone)]
pub struct FunctionUrl {
  logical_id: String,
  auth_type: FunctionUrlAuthType,
}

impl FunctionUrl {
  /// Declared through [`DockerImageFunction::add_function_url`].
  pub(crate) fn new(
    stack: &mut Stack,
    function: &DockerImageFunction,
    options: FunctionUrlOptions,
  ) -> Result<Self, ConstructError> {
    if function.stack_id() != stack.id() {
      return Err(ConstructError::InvalidConstructId {
        id: function.node_id().to_string(),
        reason: "function belongs to a different stack",
      });
    }

    let base = function.node_id();
    let url_scope = format!("{}/FunctionUrl", base);
    let url_path = format!("{}/Resource", url_scope);
    let permission_path = format!("{}/invoke-function-url", base);
    let public = options.auth_type == FunctionUrlAuthType::None;

    stack.check_path(&url_scope)?;
    stack.check_resource_path(&url_path)?;
    if public {
      stack.check_resource_path(&permission_path)?;
    }

    stack.claim_path(&url_scope)?;

    let mut properties = json!({
      "AuthType": options.auth_type.as_str(),
      "TargetFunctionArn": function.function_arn(),
    });
    if let Some(mode) = options.invoke_mode {
      properties["InvokeMode"] = json!(mode.as_str());
    }
    let logical_id = stack.add_resource(
      &url_path,
      Resource::new("AWS::Lambda::Url", properties),
    )?;

    // Public URLs still need a resource policy allowing unauthenticated calls
    if public {
      stack.add_resource(
        &permission_path,
        Resource::new(
          "AWS::Lambda::Permission",
          json!({
            "Action": "lambda:InvokeFunctionUrl",
            "FunctionName": function.function_arn(),
            "FunctionUrlAuthType": FunctionUrlAuthType::None.as_str(),
            "Principal": "*",
          }),
        ),
      )?;
    }

    Ok(Self {
      logical_id,
      auth_type: options.auth_type,
    })
  }

  pub fn logical_id(&self) -> &str {
    &self.logical_id
  }

  pub fn auth_type(&self) -> FunctionUrlAuthType {
    self.auth_type
  }

  /// The endpoint address, resolved at deploy time.
  pub fn url(&self) -> Value {
    intrinsic::get_att(&self.logical_id, "FunctionUrl")
  }

  pub fn function_url_arn(&self) -> Value {
    intrinsic::get_att(&self.logical_id, "FunctionArn")
  }
}
