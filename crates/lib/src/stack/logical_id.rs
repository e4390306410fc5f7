//! Logical id allocation.
//!
//! CloudFormation logical ids must be alphanumeric and unique within a
//! template. They are derived from the construct path so that an unchanged
//! declaration keeps its id (and therefore its physical resource) across
//! syntheses:
//!
//! - a single path component is used verbatim: `FunctionUrl`
//! - deeper paths get a human-readable prefix plus a digest of the full path:
//!   `HelloFunction/ServiceRole/Resource` -> `HelloFunctionServiceRole` + `3F0A9C12`

use crate::consts::MAX_LOGICAL_ID_HUMAN_LEN;
use crate::util::hash::hash_bytes;

/// Path components that are dropped from the human-readable part.
const HIDDEN_COMPONENTS: &[&str] = &["Resource", "Default"];

const DIGEST_LEN: usize = 8;

/// Compute the logical id for a construct path relative to its stack.
pub fn logical_id(components: &[&str]) -> String {
  if let [single] = components {
    return remove_non_alphanumeric(single);
  }

  let digest = path_digest(components);
  let human = human_part(components);
  let human: String = human.chars().take(MAX_LOGICAL_ID_HUMAN_LEN).collect();
  format!("{}{}", human, digest)
}

fn path_digest(components: &[&str]) -> String {
  let full = hash_bytes(components.join("/").as_bytes());
  full.0[..DIGEST_LEN].to_uppercase()
}

fn human_part(components: &[&str]) -> String {
  let mut kept: Vec<&str> = Vec::with_capacity(components.len());
  for component in components {
    if HIDDEN_COMPONENTS.contains(component) {
      continue;
    }
    // HelloFunction/Function -> HelloFunction
    if kept.last().is_some_and(|last| last.ends_with(component)) {
      continue;
    }
    kept.push(component);
  }
  kept.iter().map(|c| remove_non_alphanumeric(c)).collect()
}

fn remove_non_alphanumeric(s: &str) -> String {
  s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
