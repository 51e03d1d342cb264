use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::PlatformError;

/// Returns the user's home directory
///
/// Reads `USERPROFILE` on Windows and `HOME` elsewhere.
pub fn home_dir() -> Result<PathBuf, PlatformError> {
  #[cfg(windows)]
  let var = std::env::var_os("USERPROFILE");
  #[cfg(not(windows))]
  let var = std::env::var_os("HOME");

  home_dir_from(var)
}

/// Resolve a home directory from a raw environment value
pub fn home_dir_from(var: Option<OsString>) -> Result<PathBuf, PlatformError> {
  match var {
    Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
    _ => Err(PlatformError::NoHomeDirectory),
  }
}
