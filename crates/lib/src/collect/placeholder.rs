//! Stand-ins for pieces the subproject builds do not produce yet.

use std::fs;
use std::path::PathBuf;

use aria_platform::{Capabilities, ScriptKind};
use tracing::info;

use crate::collect::DistributionLayout;
use crate::error::DistError;

/// Written to `include/jni.h` when the core ships no header.
pub const HEADER_PLACEHOLDER: &str = "// JNI header placeholder (not found in source)\n";

/// Base name of the compiler entry point in `bin/`.
pub const COMPILER_STUB: &str = "javac";

/// Presence of this file means the base module tree is already in place.
pub const BASE_MODULE_MARKER: &str = "module-info.class";

const POSIX_COMPILER_STUB: &str = "#!/bin/sh\n\
echo \"javac: the Aria compiler is not available in this AriaJDK build\" >&2\n\
exit 1\n";

const BATCH_COMPILER_STUB: &str = "@echo off\r\n\
echo javac: the Aria compiler is not available in this AriaJDK build 1>&2\r\n\
exit /b 1\r\n";

const MODULE_INFO_PLACEHOLDER: &str = "// java.base module descriptor placeholder\n";
const PACKAGE_INFO_PLACEHOLDER: &str = "java.lang placeholder: classes are provided by lib/aria-rt.jar\n";

fn base_module_dir(layout: &DistributionLayout) -> PathBuf {
  layout.lib_dir.join("modules").join("java.base")
}

/// Files making up the placeholder base module, marker first
pub fn base_module_files(layout: &DistributionLayout) -> [PathBuf; 2] {
  let module = base_module_dir(layout);
  [
    module.join(BASE_MODULE_MARKER),
    module.join("java").join("lang").join("package-info.txt"),
  ]
}

/// Write a `javac` entry point that reports the compiler as unavailable.
///
/// Returns the stub's path if it was written, `None` if one already exists.
pub fn write_compiler_stub(layout: &DistributionLayout, caps: &Capabilities) -> Result<Option<PathBuf>, DistError> {
  let path = layout.bin_dir.join(caps.script_name(COMPILER_STUB));
  if path.exists() {
    return Ok(None);
  }

  let content = match caps.script_kind {
    ScriptKind::Posix => POSIX_COMPILER_STUB,
    ScriptKind::Batch => BATCH_COMPILER_STUB,
  };
  fs::write(&path, content).map_err(|e| DistError::io(&path, e))?;

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    if caps.script_kind == ScriptKind::Posix {
      fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).map_err(|e| DistError::io(&path, e))?;
    }
  }

  info!(path = %path.display(), "wrote compiler stub");
  Ok(Some(path))
}

/// Write the placeholder `java.base` module tree unless its marker exists.
pub fn write_base_module(layout: &DistributionLayout) -> Result<Vec<PathBuf>, DistError> {
  let [marker, package_info] = base_module_files(layout);
  if marker.exists() {
    return Ok(Vec::new());
  }

  let mut written = Vec::new();
  for (path, content) in [(package_info, PACKAGE_INFO_PLACEHOLDER), (marker, MODULE_INFO_PLACEHOLDER)] {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| DistError::io(parent, e))?;
    }
    if !path.exists() {
      fs::write(&path, content).map_err(|e| DistError::io(&path, e))?;
      written.push(path);
    }
  }

  info!(dir = %base_module_dir(layout).display(), "wrote base module placeholder");
  Ok(written)
}
