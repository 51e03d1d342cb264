//! The `release` descriptor at the distribution root.
//!
//! Written as newline-separated `KEY="value"` lines, the same shape as a JDK
//! `release` file. Readers also accept the older unquoted `KEY=value` form.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use aria_platform::Capabilities;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::IMPLEMENTOR;
use crate::error::DistError;
use crate::version::Versions;

/// File name of the descriptor inside the layout root.
pub const RELEASE_FILE: &str = "release";

const DATE_FORMAT: &str = "%Y-%m-%d";

const KEY_IMPLEMENTOR: &str = "IMPLEMENTOR";
const KEY_IMPLEMENTOR_VERSION: &str = "IMPLEMENTOR_VERSION";
const KEY_JAVA_VERSION: &str = "JAVA_VERSION";
const KEY_OS_ARCH: &str = "OS_ARCH";
const KEY_OS_NAME: &str = "OS_NAME";
const KEY_SOURCE: &str = "SOURCE";
const KEY_BUILD_DATE: &str = "BUILD_DATE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
  #[error("line {line}: expected KEY=value, found {text:?}")]
  Malformed { line: usize, text: String },

  #[error("missing key {0}")]
  MissingKey(&'static str),

  #[error("invalid BUILD_DATE {0:?}")]
  InvalidDate(String),
}

/// Provenance of one distribution build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseMetadata {
  pub implementor: String,
  pub implementor_version: String,
  pub runtime_version: String,
  pub os_arch: String,
  pub os_name: String,
  pub source: String,
  pub build_date: NaiveDate,
}

impl ReleaseMetadata {
  /// Metadata for a build made today on the given platform
  pub fn new(versions: &Versions, capabilities: &Capabilities, source: &str) -> Self {
    Self {
      implementor: IMPLEMENTOR.to_string(),
      implementor_version: versions.implementor.clone(),
      runtime_version: versions.runtime.clone(),
      os_arch: capabilities.arch_name().to_string(),
      os_name: capabilities.release_os_name().to_string(),
      source: source.to_string(),
      build_date: chrono::Local::now().date_naive(),
    }
  }

  /// Render in the quoted `KEY="value"` form
  pub fn render(&self) -> String {
    let date = self.build_date.format(DATE_FORMAT).to_string();
    let fields = [
      (KEY_IMPLEMENTOR, self.implementor.as_str()),
      (KEY_IMPLEMENTOR_VERSION, self.implementor_version.as_str()),
      (KEY_JAVA_VERSION, self.runtime_version.as_str()),
      (KEY_OS_ARCH, self.os_arch.as_str()),
      (KEY_OS_NAME, self.os_name.as_str()),
      (KEY_SOURCE, self.source.as_str()),
      (KEY_BUILD_DATE, date.as_str()),
    ];

    let mut out = String::new();
    for (key, value) in fields {
      out.push_str(&format!("{}=\"{}\"\n", key, value));
    }
    out
  }

  /// Parse a descriptor in either the quoted or the legacy unquoted form.
  ///
  /// Blank lines and `#` comments are ignored. Unknown keys are tolerated.
  pub fn parse(content: &str) -> Result<Self, MetadataError> {
    let mut values: HashMap<&str, &str> = HashMap::new();

    for (index, raw) in content.lines().enumerate() {
      let line = raw.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }

      let Some((key, value)) = line.split_once('=') else {
        return Err(MetadataError::Malformed {
          line: index + 1,
          text: raw.to_string(),
        });
      };
      values.insert(key.trim(), unquote(value.trim()));
    }

    let get = |key: &'static str| -> Result<String, MetadataError> {
      values
        .get(key)
        .map(|v| v.to_string())
        .ok_or(MetadataError::MissingKey(key))
    };

    let date = get(KEY_BUILD_DATE)?;
    let build_date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|_| MetadataError::InvalidDate(date))?;

    Ok(Self {
      implementor: get(KEY_IMPLEMENTOR)?,
      implementor_version: get(KEY_IMPLEMENTOR_VERSION)?,
      runtime_version: get(KEY_JAVA_VERSION)?,
      os_arch: get(KEY_OS_ARCH)?,
      os_name: get(KEY_OS_NAME)?,
      source: get(KEY_SOURCE)?,
      build_date,
    })
  }

  /// Write `release` into `root`, replacing any previous descriptor
  pub fn write(&self, root: &Path) -> Result<PathBuf, DistError> {
    let path = root.join(RELEASE_FILE);
    fs::write(&path, self.render()).map_err(|e| DistError::io(&path, e))?;
    info!(path = %path.display(), version = %self.implementor_version, "wrote release descriptor");
    Ok(path)
  }

  /// Read the descriptor from `root`
  pub fn read(root: &Path) -> Result<Self, DistError> {
    let path = root.join(RELEASE_FILE);
    let content = fs::read_to_string(&path).map_err(|e| DistError::io(&path, e))?;
    Self::parse(&content).map_err(|source| DistError::Metadata { path, source })
  }
}

fn unquote(value: &str) -> &str {
  value
    .strip_prefix('"')
    .and_then(|v| v.strip_suffix('"'))
    .unwrap_or(value)
}
