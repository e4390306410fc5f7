//! Diff between two rendered templates.
//!
//! Used to preview what a fresh synthesis would change compared to the
//! template left in the assembly directory by a previous run.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::Template;

/// How one entry changed between two templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
  Added,
  Removed,
  /// The property names (or `Type`/`DependsOn`/`Value`) whose content differs.
  Modified(Vec<String>),
}

/// Resource and output changes between an old and a new template.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TemplateDiff {
  /// Logical id -> change, for resources.
  pub resources: BTreeMap<String, Change>,
  /// Output name -> change.
  pub outputs: BTreeMap<String, Change>,
  /// Parameters or rules differ.
  pub other_sections_changed: bool,
}

impl TemplateDiff {
  pub fn is_empty(&self) -> bool {
    self.resources.is_empty() && self.outputs.is_empty() && !self.other_sections_changed
  }

  pub fn change_count(&self) -> usize {
    self.resources.len() + self.outputs.len() + usize::from(self.other_sections_changed)
  }
}

/// Compute the changes needed to go from `old` to `new`.
///
/// A missing `old` template means every resource and output is added.
pub fn diff_templates(old: Option<&Template>, new: &Template) -> TemplateDiff {
  let empty = Template::default();
  let old = old.unwrap_or(&empty);
  let mut diff = TemplateDiff::default();

  let ids: BTreeSet<&String> = old.resources.keys().chain(new.resources.keys()).collect();
  for id in ids {
    let change = match (old.resources.get(id), new.resources.get(id)) {
      (None, Some(_)) => Some(Change::Added),
      (Some(_), None) => Some(Change::Removed),
      (Some(before), Some(after)) if before != after => {
        let mut fields = Vec::new();
        if before.resource_type != after.resource_type {
          fields.push("Type".to_string());
        }
        fields.extend(changed_properties(&before.properties, &after.properties));
        if before.depends_on != after.depends_on {
          fields.push("DependsOn".to_string());
        }
        Some(Change::Modified(fields))
      }
      _ => None,
    };
    if let Some(change) = change {
      diff.resources.insert(id.clone(), change);
    }
  }

  let names: BTreeSet<&String> = old.outputs.keys().chain(new.outputs.keys()).collect();
  for name in names {
    let change = match (old.outputs.get(name), new.outputs.get(name)) {
      (None, Some(_)) => Some(Change::Added),
      (Some(_), None) => Some(Change::Removed),
      (Some(before), Some(after)) if before != after => Some(Change::Modified(vec!["Value".to_string()])),
      _ => None,
    };
    if let Some(change) = change {
      diff.outputs.insert(name.clone(), change);
    }
  }

  diff.other_sections_changed = old.parameters != new.parameters || old.rules != new.rules;
  diff
}

fn changed_properties(before: &serde_json::Value, after: &serde_json::Value) -> Vec<String> {
  let empty = serde_json::Map::new();
  let before = before.as_object().unwrap_or(&empty);
  let after = after.as_object().unwrap_or(&empty);

  let keys: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
  keys
    .into_iter()
    .filter(|k| before.get(*k) != after.get(*k))
    .cloned()
    .collect()
}
