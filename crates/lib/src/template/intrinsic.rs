//! CloudFormation intrinsic functions and pseudo parameters.
//!
//! Tokens are plain JSON values resolved by CloudFormation at deploy time.

use std::collections::BTreeSet;

use serde_json::{Value, json};

pub const ACCOUNT_ID: &str = "AWS::AccountId";
pub const REGION: &str = "AWS::Region";
pub const PARTITION: &str = "AWS::Partition";
pub const URL_SUFFIX: &str = "AWS::URLSuffix";

/// `{ "Ref": <target> }`
pub fn reference(target: &str) -> Value {
  json!({ "Ref": target })
}

/// `{ "Fn::GetAtt": [<logical id>, <attribute>] }`
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
  json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{ "Fn::Sub": <template> }`
pub fn sub(template: impl Into<String>) -> Value {
  json!({ "Fn::Sub": template.into() })
}

/// `{ "Fn::Join": [<delimiter>, [<parts>...]] }`
pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
  json!({ "Fn::Join": [delimiter, parts] })
}

/// Returns true for `AWS::*` pseudo parameters, which never need a declaration.
pub fn is_pseudo_parameter(name: &str) -> bool {
  name.starts_with("AWS::")
}

/// Collect every logical id referenced through `Ref` or `Fn::GetAtt` in `value`.
///
/// `Fn::Sub` strings are not parsed; only `${AWS::*}` pseudo parameters are
/// emitted through them.
pub fn referenced_ids(value: &Value) -> BTreeSet<String> {
  let mut ids = BTreeSet::new();
  collect_refs(value, &mut ids);
  ids
}

fn collect_refs(value: &Value, ids: &mut BTreeSet<String>) {
  match value {
    Value::Object(map) => {
      if let Some(Value::String(target)) = map.get("Ref") {
        if !is_pseudo_parameter(target) {
          ids.insert(target.clone());
        }
      }
      if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
        if let Some(Value::String(target)) = parts.first() {
          ids.insert(target.clone());
        }
      }
      for child in map.values() {
        collect_refs(child, ids);
      }
    }
    Value::Array(items) => {
      for item in items {
        collect_refs(item, ids);
      }
    }
    _ => {}
  }
}
