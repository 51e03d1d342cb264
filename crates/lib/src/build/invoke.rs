//! Running one external build command.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use aria_platform::Capabilities;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::build::{BuildKind, BuildTarget};
use crate::config::ToolchainConfig;
use crate::error::DistError;

/// Runs subproject toolchains to completion.
///
/// Output is inherited so the build tool's own progress reaches the terminal;
/// only the exit status is inspected.
#[derive(Debug, Clone)]
pub struct ToolchainInvoker {
  toolchain: ToolchainConfig,
  windows: bool,
  timeout: Option<Duration>,
}

impl ToolchainInvoker {
  pub fn new(toolchain: ToolchainConfig, capabilities: &Capabilities, timeout: Option<Duration>) -> Self {
    Self {
      toolchain,
      windows: capabilities.is_windows(),
      timeout,
    }
  }

  /// Run `command` in `working_dir` and wait for it to exit.
  ///
  /// The first element of `command` is the program; the rest are arguments.
  pub async fn invoke(&self, command: &[String], working_dir: &Path) -> Result<(), DistError> {
    let cmd_line = command.join(" ");
    let Some((program, args)) = command.split_first() else {
      return Err(DistError::Spawn {
        command: cmd_line,
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
      });
    };

    info!(cmd = %cmd_line, cwd = %working_dir.display(), "running");

    let mut child = Command::new(program)
      .args(args)
      .current_dir(working_dir)
      .stdin(Stdio::null())
      .kill_on_drop(true)
      .spawn()
      .map_err(|source| DistError::Spawn {
        command: cmd_line.clone(),
        source,
      })?;

    let status = match self.timeout {
      Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
          warn!(cmd = %cmd_line, timeout = ?limit, "command timed out, killing it");
          if let Err(e) = child.kill().await {
            debug!(error = %e, "failed to kill timed out command");
          }
          return Err(DistError::Timeout {
            command: cmd_line,
            timeout: limit,
          });
        }
      },
      None => child.wait().await,
    }
    .map_err(|source| DistError::Spawn {
      command: cmd_line.clone(),
      source,
    })?;

    if !status.success() {
      return Err(DistError::Build {
        command: cmd_line,
        exit_code: status.code(),
      });
    }

    debug!(cmd = %cmd_line, "command succeeded");
    Ok(())
  }

  /// Build one subproject with the strategy its kind calls for.
  pub async fn build(&self, target: &BuildTarget) -> Result<(), DistError> {
    info!(target = %target.name, kind = %target.kind, "building");

    match target.kind {
      BuildKind::Native => {
        let command = vec![self.toolchain.cargo.clone(), "build".to_string(), "--release".to_string()];
        self.invoke(&command, &target.path).await
      }
      BuildKind::ManagedRuntime => {
        let wrapper = self.gradle_wrapper(&target.path);
        if !wrapper.exists() {
          info!(target = %target.name, "gradle wrapper missing, generating it");
          let bootstrap = vec![self.toolchain.gradle.clone(), "wrapper".to_string()];
          self.invoke(&bootstrap, &target.path).await?;
        }

        let command = vec![wrapper.to_string_lossy().into_owned(), "build".to_string()];
        self.invoke(&command, &target.path).await
      }
    }
  }

  /// Location of the build wrapper script in a managed-runtime subproject
  pub fn gradle_wrapper(&self, dir: &Path) -> PathBuf {
    dir.join(if self.windows { "gradlew.bat" } else { "gradlew" })
  }
}
