//! Error types for the distribution pipeline.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::metadata::MetadataError;

/// Every way a pipeline run can fail.
///
/// None of these are retried. The pipeline removes the distribution output
/// directory before handing one back to the caller.
#[derive(Debug, Error)]
pub enum DistError {
  /// No Java installation to build the managed subprojects with.
  #[error("no usable Java environment: {0}")]
  Environment(String),

  /// The external command could not be started at all.
  #[error("failed to start `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },

  /// An external build tool exited unsuccessfully.
  #[error("`{command}` failed with {}", describe_exit(.exit_code))]
  Build { command: String, exit_code: Option<i32> },

  /// An external command ran past the configured timeout and was killed.
  #[error("`{command}` did not finish within {timeout:?}")]
  Timeout { command: String, timeout: Duration },

  /// A required build output was not produced.
  #[error("required artifact `{name}` not found at {}", .path.display())]
  MissingArtifact { name: String, path: PathBuf },

  /// The assembled launcher is missing or cannot report its version.
  #[error("runtime verification failed for {}: {reason}", .launcher.display())]
  Verification { launcher: PathBuf, reason: String },

  /// The archive could not be written.
  #[error("packaging {} failed: {message}", .archive.display())]
  Packaging { archive: PathBuf, message: String },

  /// An existing release descriptor could not be read back.
  #[error("invalid release descriptor {}: {source}", .path.display())]
  Metadata {
    path: PathBuf,
    #[source]
    source: MetadataError,
  },

  #[error("I/O error at {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl DistError {
  /// Wrap an I/O error with the path it happened on
  pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
    DistError::Io {
      path: path.as_ref().to_path_buf(),
      source,
    }
  }

  /// Process exit status for this failure.
  ///
  /// Build failures propagate the tool's own exit code when it fits in a
  /// process status; everything else exits with 1.
  pub fn exit_code(&self) -> u8 {
    match self {
      DistError::Build {
        exit_code: Some(code), ..
      } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
      _ => 1,
    }
  }
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "no exit code (terminated by signal)".to_string(),
  }
}
