//! Version marker files.
//!
//! The project root carries two optional one-line files naming the
//! distribution's own version and the Java version it implements. Missing
//! markers are not an error: the documented defaults are used instead.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

/// Marker file holding the implementor (AriaJDK) version.
pub const IMPLEMENTOR_VERSION_FILE: &str = "VERSION";

/// Marker file holding the Java specification version.
pub const RUNTIME_VERSION_FILE: &str = "JAVA_VERSION";

pub const DEFAULT_IMPLEMENTOR_VERSION: &str = "0.0.0";
pub const DEFAULT_RUNTIME_VERSION: &str = "17";

/// Read the first line of `marker`, or fall back to `default`.
///
/// The text is used verbatim apart from surrounding whitespace; no attempt is
/// made to validate it as a version number.
pub fn resolve(marker: &Path, default: &str) -> String {
  match fs::read_to_string(marker) {
    Ok(content) => {
      let first = content.lines().next().unwrap_or("").trim();
      if first.is_empty() {
        warn!(marker = %marker.display(), default, "version marker is empty, using default");
        default.to_string()
      } else {
        debug!(marker = %marker.display(), version = first, "resolved version");
        first.to_string()
      }
    }
    Err(e) => {
      warn!(marker = %marker.display(), default, error = %e, "version marker not readable, using default");
      default.to_string()
    }
  }
}

/// Both versions a distribution is stamped with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Versions {
  pub implementor: String,
  pub runtime: String,
}

impl Versions {
  /// Resolve both marker files under the project `root`
  pub fn resolve(root: &Path) -> Self {
    Self {
      implementor: resolve(&root.join(IMPLEMENTOR_VERSION_FILE), DEFAULT_IMPLEMENTOR_VERSION),
      runtime: resolve(&root.join(RUNTIME_VERSION_FILE), DEFAULT_RUNTIME_VERSION),
    }
  }
}
