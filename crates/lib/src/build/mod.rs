//! Subproject builds.
//!
//! Each subproject is built by its own toolchain: cargo for the native core,
//! launcher and tools, and a gradle wrapper for the managed class library and
//! compiler. Builds run one at a time, in the order [`default_targets`]
//! returns.

mod invoke;
mod sequence;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use invoke::ToolchainInvoker;
pub use sequence::BuildSequencer;

/// Which toolchain strategy builds a subproject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildKind {
  /// Ahead-of-time compiled with cargo
  Native,
  /// Compiled for the JVM through a gradle wrapper
  ManagedRuntime,
}

impl fmt::Display for BuildKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildKind::Native => write!(f, "native"),
      BuildKind::ManagedRuntime => write!(f, "managed-runtime"),
    }
  }
}

/// One subproject to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
  pub name: String,
  pub path: PathBuf,
  pub kind: BuildKind,
}

impl BuildTarget {
  pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: BuildKind) -> Self {
    Self {
      name: name.into(),
      path: path.into(),
      kind,
    }
  }
}

/// The AriaJDK subprojects in build order.
///
/// The native core comes first because the tools link against it, and the
/// launcher comes last because it may bundle the tools.
pub fn default_targets(root: &Path) -> Vec<BuildTarget> {
  vec![
    BuildTarget::new("core", root.join("core"), BuildKind::Native),
    BuildTarget::new("classlib", root.join("classlib"), BuildKind::ManagedRuntime),
    BuildTarget::new("compiler", root.join("tools").join("compiler"), BuildKind::ManagedRuntime),
    BuildTarget::new("jar", root.join("tools").join("jar"), BuildKind::Native),
    BuildTarget::new("launcher", root.join("launcher"), BuildKind::Native),
  ]
}
