//! CMake-driven native build.

use std::num::NonZeroUsize;
use std::path::Path;

use tracing::info;

use super::process::run_command;
use super::{BuildInvocation, BuildTool, ExternalError};
use crate::platform::Compiler;

/// Configures and builds with the `cmake` command line.
#[derive(Debug, Clone)]
pub struct CMakeTool {
  pub program: String,
  /// Parallel jobs passed to `--parallel` for generators that honour it.
  pub jobs: usize,
}

impl Default for CMakeTool {
  fn default() -> Self {
    Self {
      program: "cmake".to_string(),
      jobs: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
    }
  }
}

impl CMakeTool {
  pub fn new() -> Self {
    Self::default()
  }
}

impl BuildTool for CMakeTool {
  fn build(&self, invocation: &BuildInvocation<'_>) -> Result<(), ExternalError> {
    std::fs::create_dir_all(invocation.build_dir)?;

    info!(
      source = %invocation.source_dir.display(),
      build = %invocation.build_dir.display(),
      keys = invocation.config.len(),
      "configuring"
    );
    run_command(&self.program, &configure_args(invocation), Some(invocation.build_dir))?;

    info!(target = invocation.target, jobs = self.jobs, "building");
    run_command(&self.program, &build_args(invocation, self.jobs), Some(invocation.build_dir))?;
    Ok(())
  }
}

/// Arguments for the configure step.
pub fn configure_args(invocation: &BuildInvocation<'_>) -> Vec<String> {
  let mut args = vec![
    "-S".to_string(),
    path_arg(invocation.source_dir),
    "-B".to_string(),
    path_arg(invocation.build_dir),
  ];
  args.extend(invocation.config.to_defines());
  args.push(format!("-DCMAKE_INSTALL_PREFIX={}", path_arg(invocation.install_dir)));
  args
}

/// Arguments for the build step.
///
/// Only gcc toolchains get `--parallel`; multi-config generators pick their own
/// parallelism.
pub fn build_args(invocation: &BuildInvocation<'_>, jobs: usize) -> Vec<String> {
  let mut args = vec![
    "--build".to_string(),
    path_arg(invocation.build_dir),
    "--target".to_string(),
    invocation.target.to_string(),
    "--config".to_string(),
    invocation.platform.build_type.as_str().to_string(),
  ];
  if invocation.platform.compiler == Compiler::Gcc {
    args.push("--parallel".to_string());
    args.push(jobs.to_string());
  }
  args
}

fn path_arg(path: &Path) -> String {
  path.display().to_string()
}
