//! The full build-and-package run.
//!
//! Stages run strictly in order: environment check, version resolution,
//! subproject builds, collection (with metadata, placeholders and the launcher
//! smoke test), packaging and finally the optional PATH install. [`Pipeline::run`]
//! is the only place failures are handled: on any error it removes the
//! distribution output directory and then hands the error back, so a failed
//! run never leaves a half-built tree behind.

use std::fs;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::build::{BuildSequencer, ToolchainInvoker};
use crate::collect::{ArtifactCollector, CollectionReport};
use crate::config::DistConfig;
use crate::environment::{JavaEnvironment, check_java};
use crate::error::DistError;
use crate::install::{InstallOutcome, PathInstaller};
use crate::metadata::ReleaseMetadata;
use crate::package::Packager;
use crate::verify::RuntimeVerifier;
use crate::version::Versions;

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
  pub java: Option<JavaEnvironment>,
  pub versions: Versions,
  pub collection: CollectionReport,
  pub archive: PathBuf,
  pub install: Option<InstallOutcome>,
}

pub struct Pipeline {
  config: DistConfig,
}

impl Pipeline {
  pub fn new(config: DistConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &DistConfig {
    &self.config
  }

  /// Run every stage; on failure remove all partial output first.
  pub async fn run(&self) -> Result<PipelineReport, DistError> {
    match self.run_stages().await {
      Ok(report) => Ok(report),
      Err(e) => {
        error!(error = %e, "pipeline failed");
        self.cleanup();
        Err(e)
      }
    }
  }

  async fn run_stages(&self) -> Result<PipelineReport, DistError> {
    let config = &self.config;

    let java = if config.check_environment {
      Some(check_java()?)
    } else {
      None
    };

    let versions = config.versions();
    info!(
      implementor = %versions.implementor,
      runtime = %versions.runtime,
      platform = %config.capabilities.triple(),
      "starting build"
    );

    self.reset_dist_dir()?;

    let invoker = ToolchainInvoker::new(config.toolchain.clone(), &config.capabilities, config.timeout);
    BuildSequencer::new(&invoker).run(&config.targets()).await?;

    let layout = config.layout();
    let metadata = ReleaseMetadata::new(&versions, &config.capabilities, &config.source);
    let collector = ArtifactCollector::new(&layout, &config.capabilities, RuntimeVerifier::new(config.timeout));
    let collection = collector
      .collect(&config.artifacts(), &metadata, &config.launcher_path())
      .await?;

    let archive = Packager::new(config.capabilities.archive_format)
      .package(&layout, &config.archive_stem(&versions.implementor))?;

    let install = if config.install {
      Some(PathInstaller::from_env(&config.capabilities).install(&layout.bin_dir))
    } else {
      None
    };

    Ok(PipelineReport {
      java,
      versions,
      collection,
      archive,
      install,
    })
  }

  /// Start from an empty output directory
  fn reset_dist_dir(&self) -> Result<(), DistError> {
    let dist = self.config.dist_dir();
    if dist.exists() {
      info!(dir = %dist.display(), "removing previous output");
      fs::remove_dir_all(&dist).map_err(|e| DistError::io(&dist, e))?;
    }
    fs::create_dir_all(&dist).map_err(|e| DistError::io(&dist, e))
  }

  /// Remove the distribution output directory; a no-op if it is already gone
  pub fn cleanup(&self) {
    let dist = self.config.dist_dir();
    if !dist.exists() {
      return;
    }
    match fs::remove_dir_all(&dist) {
      Ok(()) => info!(dir = %dist.display(), "removed partial output"),
      Err(e) => warn!(dir = %dist.display(), error = %e, "failed to remove partial output"),
    }
  }
}
