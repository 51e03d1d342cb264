//! Implementation of `ariadist install` and the post-build PATH report.

use std::path::Path;

use anyhow::{Result, bail};

use aria_platform::{Capabilities, Shell};
use ariadist_lib::DistConfig;
use ariadist_lib::install::{InstallOutcome, PathInstaller};

use crate::output::{print_info, print_success, print_warning};

/// Put an existing distribution's `bin/` on the user's PATH.
pub fn cmd_install(config: &DistConfig) -> Result<()> {
  let bin_dir = config.layout().bin_dir;
  if !bin_dir.is_dir() {
    bail!(
      "No distribution found at {}. Run `ariadist build` first.",
      bin_dir.display()
    );
  }

  let outcome = PathInstaller::from_env(&config.capabilities).install(&bin_dir);
  report_install(&outcome, &bin_dir, &config.capabilities);
  Ok(())
}

pub fn report_install(outcome: &InstallOutcome, bin_dir: &Path, capabilities: &Capabilities) {
  match outcome {
    InstallOutcome::StartupFile { file } => {
      print_success(&format!("Added {} to PATH in {}", bin_dir.display(), file.display()));
      print_info("Open a new shell, or source that file, to pick it up.");
    }
    InstallOutcome::UserEnvironment => {
      print_success(&format!("Added {} to the user PATH", bin_dir.display()));
      print_info("Open a new terminal to pick it up.");
    }
    InstallOutcome::AlreadyPresent { location } => {
      print_info(&format!("{} is already on PATH ({})", bin_dir.display(), location));
    }
    InstallOutcome::Skipped { reason } => {
      print_warning(&format!("PATH was not updated: {}", reason));
      print_info("To use the distribution, add it to PATH yourself:");
      println!("  {}", manual_command(bin_dir, capabilities));
    }
  }
}

/// The line a user would run or add to their shell setup by hand
fn manual_command(bin_dir: &Path, capabilities: &Capabilities) -> String {
  let bin = bin_dir.to_string_lossy();
  if capabilities.is_windows() {
    format!("setx PATH \"%PATH%;{}\"", bin)
  } else {
    Shell::detect().append_path("PATH", &bin)
  }
}
