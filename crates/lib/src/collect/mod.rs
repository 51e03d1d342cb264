//! Distribution tree assembly.
//!
//! Copies subproject outputs into `bin/`, `lib/` and `include/`, fills in
//! placeholders for optional outputs that were not produced, writes the
//! release descriptor and finally smoke-tests the launcher.
//!
//! Collection is idempotent: running it again over an already populated
//! layout from the same build outputs leaves every file as it was, apart
//! from the build date in `release`.

mod placeholder;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use aria_platform::Capabilities;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::DistError;
use crate::metadata::{RELEASE_FILE, ReleaseMetadata};
use crate::verify::RuntimeVerifier;

pub use placeholder::{
  BASE_MODULE_MARKER, COMPILER_STUB, HEADER_PLACEHOLDER, base_module_files, write_base_module, write_compiler_stub,
};

/// The canonical `bin/lib/include` tree of one distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionLayout {
  pub root: PathBuf,
  pub bin_dir: PathBuf,
  pub lib_dir: PathBuf,
  pub include_dir: PathBuf,
}

impl DistributionLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    Self {
      bin_dir: root.join("bin"),
      lib_dir: root.join("lib"),
      include_dir: root.join("include"),
      root,
    }
  }

  /// Create the three subdirectories; existing directories are fine
  pub fn create_dirs(&self) -> Result<(), DistError> {
    for dir in [&self.bin_dir, &self.lib_dir, &self.include_dir] {
      fs::create_dir_all(dir).map_err(|e| DistError::io(dir, e))?;
    }
    Ok(())
  }
}

/// One expected build output and where it goes in the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSpec {
  pub name: String,
  pub source: PathBuf,
  pub dest: PathBuf,
  pub required: bool,
  /// Written to `dest` when an optional source is missing
  #[serde(skip)]
  pub placeholder: Option<Vec<u8>>,
}

impl ArtifactSpec {
  pub fn required(name: impl Into<String>, source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
    Self {
      name: name.into(),
      source: source.into(),
      dest: dest.into(),
      required: true,
      placeholder: None,
    }
  }

  pub fn optional(
    name: impl Into<String>,
    source: impl Into<PathBuf>,
    dest: impl Into<PathBuf>,
    placeholder: Option<Vec<u8>>,
  ) -> Self {
    Self {
      name: name.into(),
      source: source.into(),
      dest: dest.into(),
      required: false,
      placeholder,
    }
  }
}

/// The AriaJDK build outputs, relative to the project `root`.
pub fn default_artifacts(root: &Path, layout: &DistributionLayout, caps: &Capabilities) -> Vec<ArtifactSpec> {
  let release = |project: &Path| project.join("target").join("release");
  let core_lib = caps.static_lib_name("aria_core");

  vec![
    ArtifactSpec::required(
      "launcher",
      release(&root.join("launcher")).join(caps.exe_name("aria")),
      layout.bin_dir.join(caps.exe_name("java")),
    ),
    ArtifactSpec::required(
      "jar",
      release(&root.join("tools").join("jar")).join(caps.exe_name("jar")),
      layout.bin_dir.join(caps.exe_name("jar")),
    ),
    ArtifactSpec::required(
      "core",
      release(&root.join("core")).join(&core_lib),
      layout.lib_dir.join(&core_lib),
    ),
    ArtifactSpec::required(
      "classlib",
      root.join("classlib").join("build").join("libs").join("classlib.jar"),
      layout.lib_dir.join("aria-rt.jar"),
    ),
    ArtifactSpec::optional(
      "jni header",
      root.join("core").join("include").join("jni.h"),
      layout.include_dir.join("jni.h"),
      Some(HEADER_PLACEHOLDER.as_bytes().to_vec()),
    ),
  ]
}

/// An optional artifact that was replaced by its placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
  pub name: String,
  pub missing: PathBuf,
  pub dest: PathBuf,
}

/// What a collection run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionReport {
  /// Artifacts copied from build outputs
  pub copied: Vec<PathBuf>,
  /// Optional artifacts written from a placeholder instead
  pub substituted: Vec<Substitution>,
  /// Optional artifacts with neither a source nor a placeholder
  pub skipped: Vec<String>,
  /// Convenience files generated by the collector itself
  pub synthesized: Vec<PathBuf>,
  /// Combined output of the launcher's version query
  pub runtime_version_output: String,
}

/// Assembles the distribution tree.
pub struct ArtifactCollector<'a> {
  layout: &'a DistributionLayout,
  capabilities: &'a Capabilities,
  verifier: RuntimeVerifier,
}

impl<'a> ArtifactCollector<'a> {
  pub fn new(layout: &'a DistributionLayout, capabilities: &'a Capabilities, verifier: RuntimeVerifier) -> Self {
    Self {
      layout,
      capabilities,
      verifier,
    }
  }

  /// Populate the layout and verify the launcher found at `launcher`.
  pub async fn collect(
    &self,
    specs: &[ArtifactSpec],
    metadata: &ReleaseMetadata,
    launcher: &Path,
  ) -> Result<CollectionReport, DistError> {
    info!(root = %self.layout.root.display(), "collecting build outputs");

    let mut report = self.place_artifacts(specs)?;

    metadata.write(&self.layout.root)?;
    report.synthesized.extend(self.synthesize()?);

    report.runtime_version_output = self.verifier.verify(launcher).await?;

    info!(
      copied = report.copied.len(),
      substituted = report.substituted.len(),
      "distribution tree assembled"
    );
    Ok(report)
  }

  /// Copy or substitute every artifact in `specs`.
  pub fn place_artifacts(&self, specs: &[ArtifactSpec]) -> Result<CollectionReport, DistError> {
    self.layout.create_dirs()?;

    let mut report = CollectionReport::default();

    for spec in specs {
      if spec.source.is_file() {
        copy_artifact(&spec.source, &spec.dest)?;
        debug!(artifact = %spec.name, dest = %spec.dest.display(), "copied");
        report.copied.push(spec.dest.clone());
        continue;
      }

      if spec.required {
        return Err(DistError::MissingArtifact {
          name: spec.name.clone(),
          path: spec.source.clone(),
        });
      }

      match &spec.placeholder {
        Some(content) => {
          write_file(&spec.dest, content)?;
          warn!(
            artifact = %spec.name,
            missing = %spec.source.display(),
            dest = %spec.dest.display(),
            "optional artifact not built, wrote placeholder"
          );
          report.substituted.push(Substitution {
            name: spec.name.clone(),
            missing: spec.source.clone(),
            dest: spec.dest.clone(),
          });
        }
        None => {
          warn!(artifact = %spec.name, missing = %spec.source.display(), "optional artifact not built, skipping");
          report.skipped.push(spec.name.clone());
        }
      }
    }

    Ok(report)
  }

  /// Write the compiler stub and base module tree where they are absent
  pub fn synthesize(&self) -> Result<Vec<PathBuf>, DistError> {
    let mut written = Vec::new();
    written.extend(write_compiler_stub(self.layout, self.capabilities)?);
    written.extend(write_base_module(self.layout)?);
    Ok(written)
  }
}

/// Every file a successful collection leaves in the layout, relative to its root.
///
/// Optional artifacts without a placeholder are included only if their source
/// exists.
pub fn expected_files(
  layout: &DistributionLayout,
  specs: &[ArtifactSpec],
  capabilities: &Capabilities,
) -> BTreeSet<PathBuf> {
  let mut files = BTreeSet::new();
  let mut add = |path: &Path| {
    if let Ok(relative) = path.strip_prefix(&layout.root) {
      files.insert(relative.to_path_buf());
    }
  };

  for spec in specs {
    if spec.required || spec.placeholder.is_some() || spec.source.is_file() {
      add(&spec.dest);
    }
  }
  add(&layout.root.join(RELEASE_FILE));
  add(&layout.bin_dir.join(capabilities.script_name(COMPILER_STUB)));
  for file in base_module_files(layout) {
    add(&file);
  }

  files
}

fn copy_artifact(source: &Path, dest: &Path) -> Result<(), DistError> {
  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent).map_err(|e| DistError::io(parent, e))?;
  }
  // fs::copy carries permission bits over, so executables stay executable
  fs::copy(source, dest).map_err(|e| DistError::io(source, e))?;
  Ok(())
}

fn write_file(dest: &Path, content: &[u8]) -> Result<(), DistError> {
  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent).map_err(|e| DistError::io(parent, e))?;
  }
  fs::write(dest, content).map_err(|e| DistError::io(dest, e))
}
