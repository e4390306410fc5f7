//! Stack outputs.

use serde_json::Value;

use crate::stack::{ConstructError, Stack};
use crate::template::{Export, Output};

#[derive(Debug, Clone)]
pub struct CfnOutputProps {
  pub value: Value,
  pub description: Option<String>,
  /// Publishes the value for `Fn::ImportValue` in other stacks.
  pub export_name: Option<String>,
}

impl CfnOutputProps {
  pub fn new(value: Value) -> Self {
    Self {
      value,
      description: None,
      export_name: None,
    }
  }
}

/// A named value surfaced by the stack once it is deployed.
#[derive(Debug, Clone)]
pub struct CfnOutput {
  logical_id: String,
}

impl CfnOutput {
  pub fn new(stack: &mut Stack, id: &str, props: CfnOutputProps) -> Result<Self, ConstructError> {
    let output = Output {
      value: props.value,
      description: props.description,
      export: props.export_name.map(|name| Export { name }),
    };
    let logical_id = stack.add_output(id, output)?;
    Ok(Self { logical_id })
  }

  pub fn logical_id(&self) -> &str {
    &self.logical_id
  }
}
