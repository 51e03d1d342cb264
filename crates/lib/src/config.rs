//! Pipeline configuration.
//!
//! A [`DistConfig`] is built once when the pipeline starts and passed by
//! reference to every stage. Nothing below it reads fixed paths or re-detects
//! the platform, so tests can point a whole run at a temporary directory.

use std::path::PathBuf;
use std::time::Duration;

use aria_platform::Capabilities;
use serde::Serialize;

use crate::build::{BuildTarget, default_targets};
use crate::collect::{ArtifactSpec, DistributionLayout, default_artifacts};
use crate::version::Versions;

/// Name of the distribution, also the top-level directory inside archives.
pub const PRODUCT_NAME: &str = "AriaJDK";

/// Lowercase prefix of archive file names.
pub const ARCHIVE_PREFIX: &str = "ariajdk";

/// `IMPLEMENTOR` recorded in the release descriptor.
pub const IMPLEMENTOR: &str = "Aria Foundation";

/// Directory under the project root that receives all pipeline output.
pub const DIST_DIR: &str = "dist";

/// Programs used to drive the subproject builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainConfig {
  /// Native toolchain driver, invoked as `<cargo> build --release`
  pub cargo: String,
  /// Used only to bootstrap a missing `gradlew` wrapper
  pub gradle: String,
}

impl Default for ToolchainConfig {
  fn default() -> Self {
    Self {
      cargo: "cargo".to_string(),
      gradle: "gradle".to_string(),
    }
  }
}

/// Immutable settings for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct DistConfig {
  /// Project root containing the subprojects and version markers
  pub root: PathBuf,
  pub capabilities: Capabilities,
  pub toolchain: ToolchainConfig,
  /// Upper bound for each external command; `None` waits forever
  pub timeout: Option<Duration>,
  /// Check for `JAVA_HOME` or `java` on `PATH` before building
  pub check_environment: bool,
  /// Register `bin/` on the user's `PATH` after packaging
  pub install: bool,
  /// `SOURCE` recorded in the release descriptor
  pub source: String,
}

impl DistConfig {
  /// Defaults for a project rooted at `root` on the current host
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      capabilities: Capabilities::detect(),
      toolchain: ToolchainConfig::default(),
      timeout: None,
      check_environment: true,
      install: true,
      source: "local".to_string(),
    }
  }

  /// Everything the pipeline writes lives under this directory
  pub fn dist_dir(&self) -> PathBuf {
    self.root.join(DIST_DIR)
  }

  pub fn layout(&self) -> DistributionLayout {
    DistributionLayout::new(self.dist_dir().join(PRODUCT_NAME))
  }

  /// Subprojects in the order they must be built
  pub fn targets(&self) -> Vec<BuildTarget> {
    default_targets(&self.root)
  }

  /// Build outputs expected in the distribution tree
  pub fn artifacts(&self) -> Vec<ArtifactSpec> {
    default_artifacts(&self.root, &self.layout(), &self.capabilities)
  }

  /// Path of the primary runtime entry point inside the layout
  pub fn launcher_path(&self) -> PathBuf {
    self.layout().bin_dir.join(self.capabilities.exe_name("java"))
  }

  pub fn versions(&self) -> Versions {
    Versions::resolve(&self.root)
  }

  /// Archive file name without extension, e.g. `ariajdk-0.1.0-x86_64-linux`
  ///
  /// The version is used verbatim in `release` but must be a single path
  /// component here, so characters no file system accepts become `-`.
  pub fn archive_stem(&self, implementor_version: &str) -> String {
    format!(
      "{}-{}-{}",
      ARCHIVE_PREFIX,
      file_name_safe(implementor_version),
      file_name_safe(&self.capabilities.triple())
    )
  }
}

fn file_name_safe(text: &str) -> String {
  text
    .chars()
    .map(|c| match c {
      '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
      c if c.is_control() || c.is_whitespace() => '-',
      c => c,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn linux_config() -> DistConfig {
    let mut config = DistConfig::new("/work/aria");
    config.capabilities = Capabilities::resolve("linux", "x86_64");
    config
  }

  #[test]
  fn layout_lives_under_dist() {
    let config = linux_config();
    let layout = config.layout();

    assert_eq!(layout.root, PathBuf::from("/work/aria/dist/AriaJDK"));
    assert_eq!(layout.bin_dir, PathBuf::from("/work/aria/dist/AriaJDK/bin"));
    assert_eq!(layout.include_dir, PathBuf::from("/work/aria/dist/AriaJDK/include"));
  }

  #[test]
  fn archive_stem_includes_version_and_triple() {
    assert_eq!(linux_config().archive_stem("0.1.0"), "ariajdk-0.1.0-x86_64-linux");
  }

  #[test]
  fn archive_stem_is_a_single_file_name() {
    let config = linux_config();

    assert_eq!(config.archive_stem("feature/x"), "ariajdk-feature-x-x86_64-linux");
    assert_eq!(config.archive_stem(r"1.0\rc 2"), "ariajdk-1.0-rc-2-x86_64-linux");
    assert_eq!(config.archive_stem("2.0:beta*"), "ariajdk-2.0-beta--x86_64-linux");
  }

  #[test]
  fn launcher_is_aliased_as_java() {
    let mut config = linux_config();
    assert_eq!(config.launcher_path(), PathBuf::from("/work/aria/dist/AriaJDK/bin/java"));

    config.capabilities = Capabilities::resolve("windows", "x86_64");
    assert!(config.launcher_path().ends_with("java.exe"));
  }
}
