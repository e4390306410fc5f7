//! CloudFormation template model.
//!
//! A [`Template`] is the rendered form of one stack. Every map is a
//! [`BTreeMap`] so rendering the same declarations always produces the same
//! bytes.
//!
//! ```json
//! {
//!   "Resources": {
//!     "HelloFunction1A2B3C4D": { "Type": "AWS::Lambda::Function", "Properties": { ... } }
//!   },
//!   "Outputs": {
//!     "FunctionUrl": { "Value": { "Fn::GetAtt": ["HelloFunctionFunctionUrl5E6F7A8B", "FunctionUrl"] } }
//!   }
//! }
//! ```

pub mod diff;
pub mod intrinsic;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::hash::Hashable;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: BTreeMap<String, Parameter>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub rules: BTreeMap<String, Value>,
  #[serde(default)]
  pub resources: BTreeMap<String, Resource>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub outputs: BTreeMap<String, Output>,
}

impl Hashable for Template {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
  #[serde(rename = "Type")]
  pub resource_type: String,
  #[serde(default, skip_serializing_if = "Value::is_null")]
  pub properties: Value,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub depends_on: Vec<String>,
}

impl Resource {
  pub fn new(resource_type: &str, properties: Value) -> Self {
    Self {
      resource_type: resource_type.to_string(),
      properties,
      depends_on: Vec::new(),
    }
  }

  pub fn depends_on(mut self, logical_id: &str) -> Self {
    self.depends_on.push(logical_id.to_string());
    self
  }

  /// Look up a top-level property.
  pub fn property(&self, name: &str) -> Option<&Value> {
    self.properties.get(name)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
  pub value: Value,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub export: Option<Export>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
  #[serde(rename = "Type")]
  pub parameter_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl Template {
  /// Render as pretty JSON with a trailing newline.
  pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(self)?;
    out.push('\n');
    Ok(out)
  }

  /// Logical ids of all resources of the given type.
  pub fn resources_of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = (&'a String, &'a Resource)> {
    self
      .resources
      .iter()
      .filter(move |(_, r)| r.resource_type == resource_type)
  }

  /// References (`Ref`, `Fn::GetAtt`, `DependsOn`) to ids that are neither a
  /// resource nor a parameter of this template, as `(referrer, target)` pairs.
  pub fn dangling_references(&self) -> Vec<(String, String)> {
    let known: BTreeSet<&String> = self.resources.keys().chain(self.parameters.keys()).collect();
    let mut dangling = Vec::new();

    for (id, resource) in &self.resources {
      let targets = intrinsic::referenced_ids(&resource.properties)
        .into_iter()
        .chain(resource.depends_on.iter().cloned());
      for target in targets {
        if !known.contains(&target) {
          dangling.push((id.clone(), target));
        }
      }
    }

    for (name, output) in &self.outputs {
      for target in intrinsic::referenced_ids(&output.value) {
        if !known.contains(&target) {
          dangling.push((name.clone(), target));
        }
      }
    }

    dangling
  }
}
