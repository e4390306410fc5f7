//! Synth command implementation.
//!
//! Writes the cloud assembly and prints each stack template to stdout.

use anyhow::{Context, Result};
use tracing::info;

use hello_lambda_lib::App;

use crate::output::{print_json, print_stat, print_success, print_yaml, truncate_hash};

pub fn cmd_synth(app: &App, json: bool, quiet: bool, verbose: bool) -> Result<()> {
  let assembly = app.synth().context("Failed to synthesize cloud assembly")?;
  info!(dir = %assembly.directory.display(), stacks = assembly.stacks.len(), "cloud assembly written");

  if !quiet {
    for (i, artifact) in assembly.stacks.iter().enumerate() {
      if json {
        print_json(&artifact.template)?;
      } else {
        if i > 0 {
          println!("---");
        }
        print_yaml(&artifact.template)?;
      }
    }
  }

  print_success(&format!(
    "Synthesized {} stack(s) to {}",
    assembly.stacks.len(),
    assembly.directory.display()
  ));

  if verbose {
    for artifact in &assembly.stacks {
      print_stat("Template", &artifact.template_path.display().to_string());
      print_stat("Assets", &artifact.assets_path.display().to_string());
      for staged in &artifact.staged_assets {
        let name = staged
          .file_name()
          .map(|n| n.to_string_lossy().into_owned())
          .unwrap_or_default();
        print_stat("Image asset", truncate_hash(name.trim_start_matches("asset.")));
      }
    }
  }

  Ok(())
}
