//! Host package installation.

use tracing::{debug, info};

use super::process::run_command;
use super::{ExternalError, SystemPackager};

/// Installs packages with `apt-get install -y`.
#[derive(Debug, Clone)]
pub struct AptPackager {
  pub program: String,
}

impl Default for AptPackager {
  fn default() -> Self {
    Self {
      program: "apt-get".to_string(),
    }
  }
}

impl AptPackager {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SystemPackager for AptPackager {
  fn install(&self, packages: &[String]) -> Result<(), ExternalError> {
    if packages.is_empty() {
      debug!("no system packages required");
      return Ok(());
    }
    info!(packages = %packages.join(" "), "installing system packages");
    let args: Vec<String> = ["install", "-y"]
      .into_iter()
      .map(String::from)
      .chain(packages.iter().cloned())
      .collect();
    run_command(&self.program, &args, None)?;
    Ok(())
  }
}
