//! Platform capabilities resolved once per run.
//!
//! Every decision that depends on the host platform (archive container,
//! how to put a directory on `PATH`, executable and script file names) is
//! derived here and handed to the rest of the builder as plain data.

use serde::Serialize;

use crate::{Arch, Os};

/// Archive container produced by the packager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveFormat {
  /// Deflate-compressed zip, one entry per file
  Zip,
  /// Gzip-compressed tar
  TarGz,
}

impl ArchiveFormat {
  /// File extension without the leading dot
  pub fn extension(&self) -> &'static str {
    match self {
      ArchiveFormat::Zip => "zip",
      ArchiveFormat::TarGz => "tar.gz",
    }
  }
}

/// How the distribution's `bin` directory is registered on the search path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathInstallStrategy {
  /// Persist a user-level environment variable with `setx`
  UserEnvironment,
  /// Append an export line to the interactive shell's startup file
  ShellStartupFile,
  /// No known mechanism; warn and leave the system untouched
  Unsupported,
}

/// Flavor of the small wrapper scripts written into `bin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScriptKind {
  Posix,
  Batch,
}

/// Everything the builder needs to know about the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
  pub os: Option<Os>,
  pub arch: Option<Arch>,
  /// Raw OS identifier, used when the OS is not one we know
  pub os_id: String,
  /// Raw architecture identifier, used when the arch is not one we know
  pub arch_id: String,
  pub archive_format: ArchiveFormat,
  pub path_install: PathInstallStrategy,
  pub script_kind: ScriptKind,
}

impl Capabilities {
  /// Resolve capabilities for the host this process runs on
  pub fn detect() -> Self {
    Self::resolve(std::env::consts::OS, std::env::consts::ARCH)
  }

  /// Resolve capabilities for an arbitrary `std::env::consts` OS/arch pair
  pub fn resolve(os_id: &str, arch_id: &str) -> Self {
    let os = Os::from_consts(os_id);
    let arch = Arch::from_consts(arch_id);

    let (archive_format, path_install, script_kind) = match os {
      Some(Os::Windows) => (
        ArchiveFormat::Zip,
        PathInstallStrategy::UserEnvironment,
        ScriptKind::Batch,
      ),
      Some(Os::Linux) | Some(Os::MacOs) => (
        ArchiveFormat::TarGz,
        PathInstallStrategy::ShellStartupFile,
        ScriptKind::Posix,
      ),
      None => (ArchiveFormat::TarGz, PathInstallStrategy::Unsupported, ScriptKind::Posix),
    };

    Self {
      os,
      arch,
      os_id: os_id.to_string(),
      arch_id: arch_id.to_string(),
      archive_format,
      path_install,
      script_kind,
    }
  }

  pub fn is_windows(&self) -> bool {
    self.os == Some(Os::Windows)
  }

  /// Returns the platform triple string (e.g., "aarch64-darwin")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch_name(), self.os_name())
  }

  /// Lowercase OS identifier, falling back to the raw value
  pub fn os_name(&self) -> &str {
    match self.os {
      Some(os) => os.as_str(),
      None => &self.os_id,
    }
  }

  /// Architecture identifier, falling back to the raw value
  pub fn arch_name(&self) -> &str {
    match self.arch {
      Some(arch) => arch.as_str(),
      None => &self.arch_id,
    }
  }

  /// `OS_NAME` for the release descriptor
  pub fn release_os_name(&self) -> &str {
    match self.os {
      Some(os) => os.release_name(),
      None => &self.os_id,
    }
  }

  pub fn exe_suffix(&self) -> &'static str {
    if self.is_windows() { ".exe" } else { "" }
  }

  /// File name of an executable built from `stem`
  pub fn exe_name(&self, stem: &str) -> String {
    format!("{}{}", stem, self.exe_suffix())
  }

  /// File name of a static library built from `stem`
  pub fn static_lib_name(&self, stem: &str) -> String {
    if self.is_windows() {
      format!("{}.lib", stem)
    } else {
      format!("lib{}.a", stem)
    }
  }

  /// File name of a wrapper script named `stem`
  pub fn script_name(&self, stem: &str) -> String {
    match self.script_kind {
      ScriptKind::Batch => format!("{}.bat", stem),
      ScriptKind::Posix => stem.to_string(),
    }
  }
}
