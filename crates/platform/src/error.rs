//! Error types for aria-platform

use thiserror::Error;

/// Errors that can occur in platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("Failed to determine home directory")]
  NoHomeDirectory,

  #[error("Unknown shell: {0}. Supported: bash, zsh, fish, sh")]
  UnknownShell(String),
}
