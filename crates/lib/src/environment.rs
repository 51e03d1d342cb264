//! Java environment precheck, run before any subproject is built.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::error::DistError;

/// Where the Java installation was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JavaEnvironment {
  JavaHome(PathBuf),
  OnPath(PathBuf),
}

/// Check `JAVA_HOME` and `PATH` of the current process
pub fn check_java() -> Result<JavaEnvironment, DistError> {
  let found = resolve_java(std::env::var_os("JAVA_HOME"), which::which("java").ok())?;
  info!(java = ?found, "Java environment OK");
  Ok(found)
}

/// Prefer `JAVA_HOME`, then a `java` executable found on `PATH`.
pub fn resolve_java(java_home: Option<OsString>, java_on_path: Option<PathBuf>) -> Result<JavaEnvironment, DistError> {
  if let Some(home) = java_home.filter(|h| !h.is_empty()) {
    return Ok(JavaEnvironment::JavaHome(PathBuf::from(home)));
  }
  if let Some(java) = java_on_path {
    return Ok(JavaEnvironment::OnPath(java));
  }
  Err(DistError::Environment(
    "JAVA_HOME is not set and `java` was not found in PATH; install JDK 17+ and set JAVA_HOME".to_string(),
  ))
}
