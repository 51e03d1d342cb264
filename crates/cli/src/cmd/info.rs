use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use aria_platform::{Capabilities, Shell};
use ariadist_lib::DistConfig;
use ariadist_lib::install::PathInstaller;
use ariadist_lib::version::Versions;

use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Debug, Serialize)]
struct InfoReport {
  version: &'static str,
  platform: String,
  capabilities: Capabilities,
  versions: Versions,
  root: PathBuf,
  dist_dir: PathBuf,
  distribution: PathBuf,
  archive: String,
  shell: Shell,
  startup_file: Option<PathBuf>,
}

pub fn cmd_info(config: &DistConfig, output: OutputFormat) -> Result<()> {
  let versions = config.versions();
  let installer = PathInstaller::from_env(&config.capabilities);
  let report = InfoReport {
    version: env!("CARGO_PKG_VERSION"),
    platform: config.capabilities.triple(),
    capabilities: config.capabilities.clone(),
    archive: format!(
      "{}.{}",
      config.archive_stem(&versions.implementor),
      config.capabilities.archive_format.extension()
    ),
    versions,
    root: config.root.clone(),
    dist_dir: config.dist_dir(),
    distribution: config.layout().root,
    shell: installer.shell(),
    startup_file: installer.startup_file(),
  };

  if output.is_json() {
    return print_json(&report);
  }

  println!("ariadist v{}", report.version);
  println!();
  println!("System:");
  print_stat("Platform", &report.platform);
  print_stat("OS", report.capabilities.release_os_name());
  print_stat("Arch", report.capabilities.arch_name());
  print_stat("Archive format", report.capabilities.archive_format.extension());
  print_stat("Shell", report.shell.as_str());
  if let Some(file) = &report.startup_file {
    print_stat("Startup file", &file.display().to_string());
  }
  println!();
  println!("Versions:");
  print_stat("Implementor", &report.versions.implementor);
  print_stat("Java", &report.versions.runtime);
  println!();
  println!("Paths:");
  print_stat("Root", &report.root.display().to_string());
  print_stat("Distribution", &report.distribution.display().to_string());
  print_stat("Archive", &report.dist_dir.join(&report.archive).display().to_string());

  Ok(())
}
