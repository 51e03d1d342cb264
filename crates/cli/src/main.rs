use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ariadist_lib::{DistConfig, DistError};

mod cmd;
mod output;

use cmd::{cmd_build, cmd_info, cmd_install};
use output::{OutputFormat, print_error};

/// ariadist - build, package and install the AriaJDK distribution
#[derive(Parser)]
#[command(name = "ariadist")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(flatten)]
  options: BuildOptions,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Args, Debug)]
struct BuildOptions {
  /// Project root containing the subprojects (default: current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Give up on any external command after this long, e.g. "20m"
  #[arg(long, global = true, value_parser = humantime::parse_duration)]
  timeout: Option<Duration>,

  /// Do not add the distribution to PATH after packaging
  #[arg(long, global = true)]
  no_install: bool,

  /// Skip the JAVA_HOME / java on PATH check
  #[arg(long, global = true)]
  skip_env_check: bool,

  /// Program used for native builds
  #[arg(long, global = true, default_value = "cargo")]
  cargo: String,

  /// Program used to generate a missing gradle wrapper
  #[arg(long, global = true, default_value = "gradle")]
  gradle: String,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every subproject and package the distribution (the default)
  Build,

  /// Show platform, versions and output locations
  Info {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Add an already built distribution to PATH
  Install,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = dist_config(&cli.options).and_then(|config| match cli.command {
    None | Some(Commands::Build) => cmd_build(config),
    Some(Commands::Info { output }) => cmd_info(&config, output),
    Some(Commands::Install) => cmd_install(&config),
  });

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::from(exit_code(&e))
    }
  }
}

/// Build failures keep the failing tool's exit status
fn exit_code(err: &anyhow::Error) -> u8 {
  err.downcast_ref::<DistError>().map_or(1, DistError::exit_code)
}

fn dist_config(options: &BuildOptions) -> Result<DistConfig> {
  let root = match &options.root {
    Some(root) => root.clone(),
    None => std::env::current_dir().context("Failed to read current directory")?,
  };
  let root = dunce::canonicalize(&root).with_context(|| format!("Project root not found: {}", root.display()))?;

  let mut config = DistConfig::new(root);
  config.toolchain.cargo = options.cargo.clone();
  config.toolchain.gradle = options.gradle.clone();
  config.timeout = options.timeout;
  config.check_environment = !options.skip_env_check;
  config.install = !options.no_install;

  debug!(?config, "resolved configuration");
  Ok(config)
}
