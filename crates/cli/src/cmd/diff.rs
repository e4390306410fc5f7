//! Diff command implementation.
//!
//! Compares the templates the app would synthesize now with the ones the
//! last `synth` left in the assembly directory. Nothing is written.

use anyhow::{Context, Result};
use tracing::debug;

use hello_lambda_lib::App;
use hello_lambda_lib::synth::load_template;
use hello_lambda_lib::template::Template;
use hello_lambda_lib::template::diff::{TemplateDiff, diff_templates};

use crate::output::{print_change, print_info, print_json, print_warning};

pub fn cmd_diff(app: &App, json: bool) -> Result<()> {
  let mut diffs = Vec::with_capacity(app.stacks().len());

  for stack in app.stacks() {
    let previous = load_template(app.outdir(), stack.id())
      .with_context(|| format!("Failed to load previous template of {}", stack.id()))?;
    let current = stack.template();
    let diff = diff_templates(previous.as_ref(), &current);
    debug!(stack = %stack.id(), previous = previous.is_some(), changes = diff.change_count(), "compared templates");
    diffs.push((stack.id().to_string(), previous, current, diff));
  }

  if json {
    let entries: Vec<_> = diffs
      .iter()
      .map(|(id, previous, _, diff)| {
        serde_json::json!({
          "stack": id,
          "previous": previous.is_some(),
          "changes": diff.change_count(),
          "diff": diff,
        })
      })
      .collect();
    return print_json(&entries);
  }

  for (id, previous, current, diff) in &diffs {
    println!("Stack {}", id);
    if previous.is_none() {
      print_warning(&format!("No previous template for {} in {}", id, app.outdir().display()));
    }
    if diff.is_empty() {
      println!("There were no differences");
    } else {
      print_diff(previous.as_ref(), current, diff);
    }
    println!();
  }

  let total: usize = diffs.iter().map(|(_, _, _, d)| d.change_count()).sum();
  print_info(&format!("Number of changes: {}", total));
  Ok(())
}

fn print_diff(previous: Option<&Template>, current: &Template, diff: &TemplateDiff) {
  if diff.other_sections_changed {
    println!("Parameters or rules changed");
  }

  if !diff.resources.is_empty() {
    println!("Resources");
    for (id, change) in &diff.resources {
      // Removed resources only exist in the previous template
      let kind = current
        .resources
        .get(id)
        .or_else(|| previous.and_then(|p| p.resources.get(id)))
        .map(|r| r.resource_type.as_str())
        .unwrap_or("Resource");
      print_change(kind, id, change);
    }
  }

  if !diff.outputs.is_empty() {
    println!("Outputs");
    for (name, change) in &diff.outputs {
      print_change("Output", name, change);
    }
  }
}
