mod cmd;
mod output;
mod stack;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hello_lambda_lib::App;
use hello_lambda_lib::config::AppConfig;

use crate::cmd::{cmd_diff, cmd_list, cmd_synth};
use crate::output::print_error;
use crate::stack::{HelloLambdaStack, STACK_ID};

/// hello-lambda - Synthesizes a container-image Lambda behind a public URL
#[derive(Parser)]
#[command(name = "hello-lambda")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Cloud assembly directory (overrides CDK_OUTDIR)
  #[arg(short, long, global = true, value_name = "DIR")]
  output: Option<PathBuf>,

  /// Context value, may be repeated
  #[arg(short, long = "context", global = true, value_name = "KEY=VALUE")]
  context: Vec<String>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Synthesize the cloud assembly and print the stack template (default)
  Synth {
    /// Print the template as JSON instead of YAML
    #[arg(long)]
    json: bool,

    /// Write the assembly without printing the template
    #[arg(short, long)]
    quiet: bool,
  },

  /// List the stacks in the app
  List {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Compare the stack templates with the last synthesized assembly
  Diff {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let config = AppConfig::from_env()
    .context("Failed to read configuration from the environment")?
    .with_outdir(cli.output)
    .with_context_pairs(&cli.context)
    .context("Failed to parse --context")?;

  let mut app = App::from_config(&config);
  HelloLambdaStack::new(&mut app, STACK_ID).with_context(|| format!("Failed to declare {}", STACK_ID))?;

  match cli.command.unwrap_or(Commands::Synth {
    json: false,
    quiet: false,
  }) {
    Commands::Synth { json, quiet } => cmd_synth(&app, json, quiet, cli.verbose),
    Commands::List { json } => cmd_list(&app, json, cli.verbose),
    Commands::Diff { json } => cmd_diff(&app, json),
  }
}
