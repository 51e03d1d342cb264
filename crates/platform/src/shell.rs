//! Shell detection and startup-file syntax

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::PlatformError;

/// Interactive shells whose startup files we know how to extend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Sh,
}

impl Shell {
  /// Shell used when `$SHELL` is unset or names something we don't recognise
  pub const DEFAULT: Shell = Shell::Zsh;

  /// Detect the current shell from `$SHELL`
  pub fn detect() -> Self {
    Self::detect_from(std::env::var("SHELL").ok().as_deref())
  }

  /// Detect a shell from the value of a `$SHELL`-style variable
  pub fn detect_from(shell: Option<&str>) -> Self {
    let Some(shell) = shell else {
      debug!(default = %Self::DEFAULT, "SHELL not set, using default shell");
      return Self::DEFAULT;
    };

    let shell_name = Path::new(shell)
      .file_name()
      .and_then(|n| n.to_str())
      .unwrap_or("")
      .to_lowercase();

    if let Ok(shell) = shell_name.parse() {
      return shell;
    }

    // e.g. "bash5" or "zsh-static"
    if shell_name.contains("zsh") {
      Shell::Zsh
    } else if shell_name.contains("bash") {
      Shell::Bash
    } else if shell_name.contains("fish") {
      Shell::Fish
    } else {
      debug!(shell = %shell_name, default = %Self::DEFAULT, "unrecognized shell, using default shell");
      Self::DEFAULT
    }
  }

  /// Get the shell name as a string
  pub fn as_str(&self) -> &'static str {
    match self {
      Shell::Bash => "bash",
      Shell::Zsh => "zsh",
      Shell::Fish => "fish",
      Shell::Sh => "sh",
    }
  }

  /// Startup file this shell reads for interactive sessions, relative to `home`
  pub fn startup_file(&self, home: &Path) -> PathBuf {
    match self {
      Shell::Bash => home.join(".bashrc"),
      Shell::Zsh => home.join(".zshrc"),
      Shell::Fish => home.join(".config").join("fish").join("config.fish"),
      Shell::Sh => home.join(".profile"),
    }
  }

  /// Generate an append statement for a PATH-like variable
  pub fn append_path(&self, name: &str, value: &str) -> String {
    match self {
      Shell::Fish => format!("set -gx {} ${} \"{}\"", name, name, value),
      Shell::Bash | Shell::Zsh | Shell::Sh => format!("export {}=\"${}:{}\"", name, name, value),
    }
  }

  /// Generate a comment for this shell
  pub fn comment(&self, text: &str) -> String {
    format!("# {}", text)
  }
}

impl FromStr for Shell {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "bash" => Ok(Shell::Bash),
      "zsh" => Ok(Shell::Zsh),
      "fish" => Ok(Shell::Fish),
      "sh" => Ok(Shell::Sh),
      _ => Err(PlatformError::UnknownShell(s.to_string())),
    }
  }
}

impl fmt::Display for Shell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
