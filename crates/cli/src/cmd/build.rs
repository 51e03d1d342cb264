//! Implementation of `ariadist build`, also run when no subcommand is given.

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};

use ariadist_lib::config::PRODUCT_NAME;
use ariadist_lib::{DistConfig, Pipeline, PipelineReport};

use super::install::report_install;
use crate::output::{format_bytes, format_duration, print_banner, print_stat, print_success, print_warning};

/// Run the whole pipeline and print a summary.
///
/// On failure nothing is left under `dist/`; the error carries the failing
/// command or missing path.
pub fn cmd_build(config: DistConfig) -> Result<()> {
  print_banner(&format!(
    "Building {} for {}",
    PRODUCT_NAME,
    config.capabilities.triple()
  ));
  print_stat("Root", &config.root.display().to_string());

  let started = Instant::now();
  let layout = config.layout();
  let capabilities = config.capabilities.clone();

  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;
  let report = rt.block_on(Pipeline::new(config).run()).context("Build failed")?;

  print_summary(&report, started.elapsed());

  if let Some(outcome) = &report.install {
    report_install(outcome, &layout.bin_dir, &capabilities);
  }

  Ok(())
}

fn print_summary(report: &PipelineReport, elapsed: std::time::Duration) {
  for substitution in &report.collection.substituted {
    print_warning(&format!(
      "{} was not built; wrote a placeholder to {}",
      substitution.name,
      substitution.dest.display()
    ));
  }
  for name in &report.collection.skipped {
    print_warning(&format!("{} was not built; left out of the distribution", name));
  }

  println!();
  print_success(&format!("{} {} packaged", PRODUCT_NAME, report.versions.implementor));
  print_stat("Archive", &report.archive.display().to_string());
  if let Ok(meta) = fs::metadata(&report.archive) {
    print_stat("Size", &format_bytes(meta.len()));
  }
  print_stat("Java version", &report.versions.runtime);
  if let Some(line) = report.collection.runtime_version_output.lines().next() {
    print_stat("Runtime", line.trim());
  }
  print_stat("Time", &format_duration(elapsed));
}
