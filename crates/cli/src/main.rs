mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use l2dkit_lib::{Config, Packaging};

use crate::cmd::{cmd_build, cmd_run, cmd_setup, cmd_tag};
use crate::output::{OutputFormat, print_error};

/// Build orchestrator for the Live2D Cubism Java binding.
///
/// Without a subcommand, provisions the working directory and then builds and
/// packages the shared and platform archives.
#[derive(Parser)]
#[command(name = "l2dkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Working directory (default: current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// How archives are written
  #[arg(long, global = true, value_enum, default_value_t = PackagerArg::Jar)]
  packager: PackagerArg,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Download the Cubism SDK and GL headers if missing
  Setup,
  /// Build the native module and package the archives
  Build,
  /// Print the platform tag of this machine
  Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PackagerArg {
  /// The JDK `jar` tool
  Jar,
  /// Built-in zip writer
  Zip,
}

impl From<PackagerArg> for Packaging {
  fn from(arg: PackagerArg) -> Self {
    match arg {
      PackagerArg::Jar => Packaging::Jar,
      PackagerArg::Zip => Packaging::Zip,
    }
  }
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  if let Err(err) = run(cli) {
    print_error(&format!("{err:#}"));
    std::process::exit(exit_code(&err));
  }
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  if let Some(Commands::Tag) = cli.command {
    return cmd_tag(cli.output);
  }

  let config = load_config(&cli)?;
  match cli.command {
    None => cmd_run(&config, cli.output),
    Some(Commands::Setup) => cmd_setup(&config, cli.output),
    Some(Commands::Build) => cmd_build(&config, cli.output),
    Some(Commands::Tag) => cmd_tag(cli.output),
  }
}

fn load_config(cli: &Cli) -> Result<Config> {
  let root = match &cli.root {
    Some(root) => root.clone(),
    None => std::env::current_dir().context("Failed to read current directory")?,
  };
  let root = dunce::canonicalize(&root).with_context(|| format!("Working directory not found: {}", root.display()))?;

  let config = Config::from_env(root).with_packaging(cli.packager.into());
  debug!(root = ?config.layout.root, packaging = ?config.packaging, "loaded configuration");
  Ok(config)
}

/// The failing tool's exit code when a subprocess caused the error, else 1.
fn exit_code(err: &anyhow::Error) -> i32 {
  err
    .chain()
    .find_map(|cause| cause.downcast_ref::<l2dkit_lib::Error>())
    .map_or(1, l2dkit_lib::Error::exit_code)
}
