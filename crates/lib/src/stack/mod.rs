//! Stacks: named, deployable groups of resource declarations.
//!
//! Constructs take `&mut Stack`, claim a construct path, and register the
//! CloudFormation resources they expand to. Nothing is written until
//! [`crate::app::App::synth`] renders each stack with [`Stack::template`].

pub mod logical_id;
mod validation;

pub use validation::{Validation, ValidationError};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::assets::{AssetError, DockerImageAsset};
use crate::consts::{MAX_STACK_ID_LEN, MIN_BOOTSTRAP_VERSION};
use crate::template::{Output, Parameter, Resource, Template};
use crate::util::hash::ContentHash;

#[derive(Debug, thiserror::Error)]
pub enum ConstructError {
  #[error("invalid stack id '{id}': {reason}")]
  InvalidStackId { id: String, reason: &'static str },

  #[error("invalid construct id '{id}': {reason}")]
  InvalidConstructId { id: String, reason: &'static str },

  #[error("there is already a construct with id '{id}' in {scope}")]
  DuplicateId { scope: String, id: String },

  #[error("logical id '{logical_id}' for {path} is already taken")]
  LogicalIdCollision { logical_id: String, path: String },

  #[error("function {function} already has a function URL")]
  FunctionUrlExists { function: String },

  #[error(transparent)]
  Asset(#[from] AssetError),
}

/// Target account and region of a stack.
///
/// Either part may be left open, in which case the deploy tooling uses the
/// credentials' account or region.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
  pub account: Option<String>,
  pub region: Option<String>,
}

impl Environment {
  pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
    Self {
      account: Some(account.into()),
      region: Some(region.into()),
    }
  }

  pub fn is_agnostic(&self) -> bool {
    self.account.is_none() && self.region.is_none()
  }

  /// Account as written into deploy role ARNs; a `${AWS::AccountId}` placeholder when open.
  pub fn account_or_placeholder(&self) -> String {
    self.account.clone().unwrap_or_else(|| "${AWS::AccountId}".to_string())
  }

  /// Region as written into deploy role ARNs; a `${AWS::Region}` placeholder when open.
  pub fn region_or_placeholder(&self) -> String {
    self.region.clone().unwrap_or_else(|| "${AWS::Region}".to_string())
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "aws://{}/{}",
      self.account.as_deref().unwrap_or("unknown-account"),
      self.region.as_deref().unwrap_or("unknown-region")
    )
  }
}

#[derive(Debug, Default, Clone)]
pub struct StackProps {
  /// Falls back to the app's default environment when `None`.
  pub env: Option<Environment>,
  pub description: Option<String>,
}

pub struct Stack {
  id: String,
  env: Environment,
  description: Option<String>,
  qualifier: String,
  /// Construct paths claimed so far, relative to the stack.
  paths: BTreeSet<String>,
  resources: BTreeMap<String, Resource>,
  outputs: BTreeMap<String, Output>,
  assets: BTreeMap<ContentHash, DockerImageAsset>,
  validations: Vec<(String, Box<dyn Validation>)>,
}

impl fmt::Debug for Stack {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Stack")
      .field("id", &self.id)
      .field("env", &self.env)
      .field("resources", &self.resources.keys().collect::<Vec<_>>())
      .field("outputs", &self.outputs.keys().collect::<Vec<_>>())
      .field("assets", &self.assets.len())
      .field("validations", &self.validations.len())
      .finish()
  }
}

impl Stack {
  pub(crate) fn new(id: &str, env: Environment, description: Option<String>, qualifier: &str) -> Result<Self, ConstructError> {
    validate_stack_id(id)?;
    Ok(Self {
      id: id.to_string(),
      env,
      description,
      qualifier: qualifier.to_string(),
      paths: BTreeSet::new(),
      resources: BTreeMap::new(),
      outputs: BTreeMap::new(),
      assets: BTreeMap::new(),
      validations: Vec::new(),
    })
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn environment(&self) -> &Environment {
    &self.env
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  /// Bootstrap qualifier used for asset repositories and deploy roles.
  pub fn qualifier(&self) -> &str {
    &self.qualifier
  }

  pub fn resources(&self) -> &BTreeMap<String, Resource> {
    &self.resources
  }

  pub fn outputs(&self) -> &BTreeMap<String, Output> {
    &self.outputs
  }

  pub fn assets(&self) -> impl Iterator<Item = &DockerImageAsset> {
    self.assets.values()
  }

  pub fn template_file_name(&self) -> String {
    format!("{}.template.json", self.id)
  }

  pub fn assets_file_name(&self) -> String {
    format!("{}.assets.json", self.id)
  }

  /// Claim a construct path such as `HelloFunction` or `HelloFunction/ServiceRole`.
  ///
  /// The last component must be a valid id and unique among its siblings.
  pub fn claim_path(&mut self, path: &str) -> Result<(), ConstructError> {
    self.check_path(path)?;
    self.paths.insert(path.to_string());
    Ok(())
  }

  /// Fail exactly as [`Stack::claim_path`] would, without claiming anything.
  ///
  /// Constructs that register several entries check them all first, so a
  /// failure leaves the stack untouched.
  pub fn check_path(&self, path: &str) -> Result<(), ConstructError> {
    let (scope, id) = match path.rsplit_once('/') {
      Some((scope, id)) => (format!("{}/{}", self.id, scope), id),
      None => (self.id.clone(), path),
    };
    validate_construct_id(id)?;

    if self.paths.contains(path) {
      return Err(ConstructError::DuplicateId {
        scope,
        id: id.to_string(),
      });
    }
    Ok(())
  }

  /// Fail exactly as [`Stack::add_resource`] would, returning the logical id
  /// the resource would get.
  pub fn check_resource_path(&self, path: &str) -> Result<String, ConstructError> {
    self.check_path(path)?;
    let components: Vec<&str> = path.split('/').collect();
    let logical_id = logical_id::logical_id(&components);

    if self.resources.contains_key(&logical_id) || self.outputs.contains_key(&logical_id) {
      return Err(ConstructError::LogicalIdCollision {
        logical_id,
        path: path.to_string(),
      });
    }
    Ok(logical_id)
  }

  /// Register a resource at `path` and return its logical id.
  pub fn add_resource(&mut self, path: &str, resource: Resource) -> Result<String, ConstructError> {
    let logical_id = self.check_resource_path(path)?;
    self.paths.insert(path.to_string());

    debug!(stack = %self.id, path, logical_id = %logical_id, resource_type = %resource.resource_type, "declared resource");
    self.resources.insert(logical_id.clone(), resource);
    Ok(logical_id)
  }

  /// Register a top-level output named `id`.
  pub fn add_output(&mut self, id: &str, output: Output) -> Result<String, ConstructError> {
    self.check_path(id)?;
    let logical_id = logical_id::logical_id(&[id]);

    if self.outputs.contains_key(&logical_id) || self.resources.contains_key(&logical_id) {
      return Err(ConstructError::LogicalIdCollision {
        logical_id,
        path: id.to_string(),
      });
    }

    self.paths.insert(id.to_string());
    debug!(stack = %self.id, logical_id = %logical_id, "declared output");
    self.outputs.insert(logical_id.clone(), output);
    Ok(logical_id)
  }

  /// Track an image asset so synthesis stages it. Identical assets are kept once.
  pub fn add_asset(&mut self, asset: DockerImageAsset) {
    self.assets.entry(asset.fingerprint.clone()).or_insert(asset);
  }

  /// Attach a check that runs when the app is synthesized.
  pub fn add_validation(&mut self, path: &str, validation: impl Validation + 'static) {
    self.validations.push((path.to_string(), Box::new(validation)));
  }

  /// Run all attached checks plus the structural checks on the rendered template.
  pub fn validate(&self) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (path, validation) in &self.validations {
      for message in validation.validate() {
        errors.push(ValidationError::new(format!("{}/{}", self.id, path), message));
      }
    }

    if self.resources.is_empty() {
      errors.push(ValidationError::new(
        self.id.clone(),
        "stack declares no resources; CloudFormation rejects empty templates".to_string(),
      ));
    }

    for (referrer, target) in self.template().dangling_references() {
      errors.push(ValidationError::new(
        format!("{}/{}", self.id, referrer),
        format!("references '{}', which is not declared in this stack", target),
      ));
    }

    errors
  }

  /// Render the stack as a CloudFormation template.
  ///
  /// Adds the `BootstrapVersion` parameter and `CheckBootstrapVersion` rule
  /// the deploy tooling relies on.
  pub fn template(&self) -> Template {
    let mut parameters = BTreeMap::new();
    parameters.insert(
      "BootstrapVersion".to_string(),
      Parameter {
        parameter_type: "AWS::SSM::Parameter::Value<String>".to_string(),
        default: Some(json!(format!("/cdk-bootstrap/{}/version", self.qualifier))),
        description: Some(
          "Version of the CDK Bootstrap resources in this environment, automatically retrieved from SSM Parameter Store."
            .to_string(),
        ),
      },
    );

    let old_versions: Vec<String> = (1..MIN_BOOTSTRAP_VERSION).map(|v| v.to_string()).collect();
    let mut rules = BTreeMap::new();
    rules.insert(
      "CheckBootstrapVersion".to_string(),
      json!({
        "Assertions": [{
          "Assert": { "Fn::Not": [{ "Fn::Contains": [old_versions, { "Ref": "BootstrapVersion" }] }] },
          "AssertDescription": "CDK bootstrap stack version 6 required. Please run 'cdk bootstrap' with a recent version of the CDK CLI."
        }]
      }),
    );

    Template {
      description: self.description.clone(),
      parameters,
      rules,
      resources: self.resources.clone(),
      outputs: self.outputs.clone(),
    }
  }
}

fn validate_stack_id(id: &str) -> Result<(), ConstructError> {
  let reason = if id.is_empty() {
    Some("must not be empty")
  } else if id.len() > MAX_STACK_ID_LEN {
    Some("must be at most 128 characters")
  } else if !id.starts_with(|c: char| c.is_ascii_alphabetic()) {
    Some("must start with a letter")
  } else if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
    Some("may only contain letters, digits and '-'")
  } else {
    None
  };

  match reason {
    Some(reason) => Err(ConstructError::InvalidStackId {
      id: id.to_string(),
      reason,
    }),
    None => Ok(()),
  }
}

fn validate_construct_id(id: &str) -> Result<(), ConstructError> {
  let reason = if id.is_empty() {
    Some("must not be empty")
  } else if !id.chars().any(|c| c.is_ascii_alphanumeric()) {
    Some("must contain at least one letter or digit")
  } else {
    None
  };

  match reason {
    Some(reason) => Err(ConstructError::InvalidConstructId {
      id: id.to_string(),
      reason,
    }),
    None => Ok(()),
  }
}
