//! Launcher smoke test.
//!
//! The only correctness check the pipeline makes on its outputs: the
//! assembled launcher must at least be able to report its own version.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::DistError;

/// Argument that asks the launcher for its version.
pub const VERSION_ARG: &str = "-version";

#[derive(Debug, Clone, Default)]
pub struct RuntimeVerifier {
  timeout: Option<Duration>,
}

impl RuntimeVerifier {
  pub fn new(timeout: Option<Duration>) -> Self {
    Self { timeout }
  }

  /// Run `<launcher> -version` and return its combined output.
  ///
  /// The output is logged but not interpreted; only the exit status counts.
  pub async fn verify(&self, launcher: &Path) -> Result<String, DistError> {
    let fail = |reason: String| DistError::Verification {
      launcher: launcher.to_path_buf(),
      reason,
    };

    if !launcher.is_file() {
      return Err(fail("launcher not found".to_string()));
    }

    info!(launcher = %launcher.display(), "verifying runtime");

    let mut command = Command::new(launcher);
    command
      .arg(VERSION_ARG)
      .stdin(Stdio::null())
      .kill_on_drop(true);

    let output = match self.timeout {
      Some(limit) => tokio::time::timeout(limit, command.output())
        .await
        .map_err(|_| fail(format!("no response within {:?}", limit)))?,
      None => command.output().await,
    }
    .map_err(|e| fail(format!("could not run launcher: {}", e)))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let combined = combined.trim().to_string();

    if !output.status.success() {
      debug!(output = %combined, "launcher output");
      let code = output
        .status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string());
      return Err(fail(format!("`{}` exited with code {}: {}", VERSION_ARG, code, combined)));
    }

    info!(output = %combined, "launcher responded");
    Ok(combined)
  }
}
