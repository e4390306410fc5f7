//! List command implementation.

use anyhow::{Context, Result};

use hello_lambda_lib::App;
use hello_lambda_lib::util::hash::Hashable;

use crate::output::{print_json, print_stat};

pub fn cmd_list(app: &App, json: bool, verbose: bool) -> Result<()> {
  if json {
    let stacks = app
      .stacks()
      .iter()
      .map(|stack| -> Result<serde_json::Value> {
        let hash = stack.template().compute_hash().context("Failed to hash template")?;
        Ok(serde_json::json!({
          "id": stack.id(),
          "environment": stack.environment().to_string(),
          "resources": stack.resources().len(),
          "outputs": stack.outputs().len(),
          "template_hash": hash.0,
        }))
      })
      .collect::<Result<Vec<_>>>()?;
    return print_json(&stacks);
  }

  for stack in app.stacks() {
    println!("{}", stack.id());
    if verbose {
      let hash = stack.template().compute_hash().context("Failed to hash template")?;
      print_stat("Environment", &stack.environment().to_string());
      print_stat("Resources", &stack.resources().len().to_string());
      print_stat("Template hash", &hash.0);
    }
  }

  Ok(())
}
