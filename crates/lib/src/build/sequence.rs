use tracing::{error, info};

use crate::build::{BuildTarget, ToolchainInvoker};
use crate::error::DistError;

/// Builds subprojects strictly one after another.
///
/// Subproject toolchains share caches and lock files, so nothing here runs
/// concurrently. The first failure ends the sequence.
pub struct BuildSequencer<'a> {
  invoker: &'a ToolchainInvoker,
}

impl<'a> BuildSequencer<'a> {
  pub fn new(invoker: &'a ToolchainInvoker) -> Self {
    Self { invoker }
  }

  pub async fn run(&self, targets: &[BuildTarget]) -> Result<(), DistError> {
    for (index, target) in targets.iter().enumerate() {
      info!(step = index + 1, total = targets.len(), target = %target.name, "build step");
      if let Err(e) = self.invoker.build(target).await {
        error!(target = %target.name, error = %e, "build failed, skipping remaining targets");
        return Err(e);
      }
    }
    Ok(())
  }
}
