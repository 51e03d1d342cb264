//! Registering the distribution's `bin/` on the user's search path.
//!
//! This is best effort. Nothing here returns an error: when the change can't
//! be made the outcome says why and the caller tells the user how to do it
//! by hand.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use aria_platform::{Capabilities, PathInstallStrategy, Shell, home_dir};
use serde::Serialize;
use tracing::{info, warn};

/// Comment written above the line appended to a startup file.
pub const INSTALL_COMMENT: &str = "Added by AriaJDK installer";

/// `setx` truncates anything longer than this.
pub const SETX_MAX_LEN: usize = 1024;

/// What an install attempt did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum InstallOutcome {
  /// An export line was appended to this startup file
  StartupFile { file: PathBuf },
  /// The persistent user `PATH` variable was updated
  UserEnvironment,
  /// The directory was already registered; nothing changed
  AlreadyPresent { location: String },
  /// Nothing changed
  Skipped { reason: String },
}

impl InstallOutcome {
  pub fn changed_something(&self) -> bool {
    matches!(self, InstallOutcome::StartupFile { .. } | InstallOutcome::UserEnvironment)
  }
}

/// Appends a directory to the user's persistent `PATH`.
#[derive(Debug, Clone)]
pub struct PathInstaller {
  strategy: PathInstallStrategy,
  shell: Shell,
  home: Option<PathBuf>,
  /// User-level `PATH`; read from the registry when `None`
  user_path: Option<String>,
}

impl PathInstaller {
  pub fn new(strategy: PathInstallStrategy, shell: Shell, home: Option<PathBuf>) -> Self {
    Self {
      strategy,
      shell,
      home,
      user_path: None,
    }
  }

  /// Installer for this host, with the shell taken from `$SHELL`
  pub fn from_env(capabilities: &Capabilities) -> Self {
    Self {
      strategy: capabilities.path_install,
      shell: Shell::detect(),
      home: home_dir().ok(),
      user_path: None,
    }
  }

  pub fn shell(&self) -> Shell {
    self.shell
  }

  /// The startup file a shell-based install would edit
  pub fn startup_file(&self) -> Option<PathBuf> {
    self.home.as_deref().map(|home| self.shell.startup_file(home))
  }

  pub fn install(&self, bin_dir: &Path) -> InstallOutcome {
    // startup files are read from any directory
    let bin_dir = dunce::canonicalize(bin_dir).unwrap_or_else(|_| bin_dir.to_path_buf());
    info!(bin = %bin_dir.display(), strategy = ?self.strategy, "adding to PATH");

    let outcome = match self.strategy {
      PathInstallStrategy::ShellStartupFile => self.append_to_startup_file(&bin_dir),
      PathInstallStrategy::UserEnvironment => self.persist_user_path(&bin_dir),
      PathInstallStrategy::Unsupported => InstallOutcome::Skipped {
        reason: "unknown operating system".to_string(),
      },
    };

    if let InstallOutcome::Skipped { reason } = &outcome {
      warn!(reason = %reason, "PATH not updated");
    }
    outcome
  }

  fn append_to_startup_file(&self, bin_dir: &Path) -> InstallOutcome {
    let Some(file) = self.startup_file() else {
      return InstallOutcome::Skipped {
        reason: "could not determine home directory".to_string(),
      };
    };

    let line = self.shell.append_path("PATH", &bin_dir.to_string_lossy());

    // Repeated installs must not stack duplicate entries.
    if let Ok(existing) = fs::read_to_string(&file) {
      if existing.lines().any(|l| l.trim() == line) {
        info!(file = %file.display(), "PATH entry already present");
        return InstallOutcome::AlreadyPresent {
          location: file.display().to_string(),
        };
      }
    }

    let block = format!("\n{}\n{}\n", self.shell.comment(INSTALL_COMMENT), line);
    match append(&file, &block) {
      Ok(()) => {
        info!(file = %file.display(), shell = %self.shell, "PATH entry appended");
        InstallOutcome::StartupFile { file }
      }
      Err(e) => InstallOutcome::Skipped {
        reason: format!("could not write {}: {}", file.display(), e),
      },
    }
  }

  fn persist_user_path(&self, bin_dir: &Path) -> InstallOutcome {
    // The process PATH also holds the machine entries; only the user value is rewritten.
    let current = match &self.user_path {
      Some(path) => path.clone(),
      None => match query_user_path() {
        Ok(path) => path,
        Err(reason) => return InstallOutcome::Skipped { reason },
      },
    };

    let value = match appended_user_path(&current, &bin_dir.to_string_lossy()) {
      Ok(Some(value)) => value,
      Ok(None) => {
        return InstallOutcome::AlreadyPresent {
          location: "PATH".to_string(),
        };
      }
      Err(reason) => return InstallOutcome::Skipped { reason },
    };

    match Command::new("setx").arg("PATH").arg(&value).status() {
      Ok(status) if status.success() => InstallOutcome::UserEnvironment,
      Ok(status) => InstallOutcome::Skipped {
        reason: format!("setx exited with {}", status),
      },
      Err(e) => InstallOutcome::Skipped {
        reason: format!("could not run setx: {}", e),
      },
    }
  }
}

/// The user `PATH` with `bin` appended, `None` if it is already there.
///
/// Values `setx` would truncate are refused.
fn appended_user_path(current: &str, bin: &str) -> Result<Option<String>, String> {
  let wanted = bin.trim_end_matches('\\');
  if current
    .split(';')
    .any(|entry| entry.trim_end_matches('\\').eq_ignore_ascii_case(wanted))
  {
    return Ok(None);
  }

  let value = if current.is_empty() {
    bin.to_string()
  } else {
    format!("{};{}", current.trim_end_matches(';'), bin)
  };

  if value.len() > SETX_MAX_LEN {
    warn!(length = value.len(), limit = SETX_MAX_LEN, "user PATH too long for setx");
    return Err(format!(
      "user PATH would be {} characters; setx truncates at {}",
      value.len(),
      SETX_MAX_LEN
    ));
  }
  Ok(Some(value))
}

/// Read `HKCU\Environment\Path`; a missing value is an empty `PATH`.
fn query_user_path() -> Result<String, String> {
  let output = Command::new("reg")
    .args(["query", r"HKCU\Environment", "/v", "Path"])
    .output()
    .map_err(|e| format!("could not run reg: {}", e))?;

  if !output.status.success() {
    return Ok(String::new());
  }
  Ok(parse_reg_value(&String::from_utf8_lossy(&output.stdout)).unwrap_or_default())
}

/// Extract the data of the `Path` value from `reg query` output.
fn parse_reg_value(output: &str) -> Option<String> {
  output.lines().find_map(|line| {
    let (name, rest) = line.trim().split_once(char::is_whitespace)?;
    if !name.eq_ignore_ascii_case("path") {
      return None;
    }
    let rest = rest.trim_start();
    let (kind, data) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    kind.starts_with("REG_").then(|| data.trim().to_string())
  })
}
