use std::fmt;

use serde::Serialize;

/// Operating system variants the distribution is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  ///
  /// Returns `None` if the OS is not one we know how to package for
  pub fn current() -> Option<Self> {
    Self::from_consts(std::env::consts::OS)
  }

  /// Map a `std::env::consts::OS` value to a known OS
  pub fn from_consts(os: &str) -> Option<Self> {
    match os {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier used in archive names
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }

  /// Returns the `OS_NAME` value recorded in the release descriptor
  pub fn release_name(&self) -> &'static str {
    match self {
      Self::Linux => "Linux",
      Self::MacOs => "Darwin",
      Self::Windows => "Windows",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
