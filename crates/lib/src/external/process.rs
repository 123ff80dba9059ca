//! Blocking process execution.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use super::ExternalError;

/// Run `program` with `args`, returning trimmed stdout.
///
/// A non-zero exit becomes [`ExternalError::CmdFailed`] carrying stderr unchanged.
pub fn run_command(program: &str, args: &[String], cwd: Option<&Path>) -> Result<String, ExternalError> {
  let cmd = std::iter::once(program.to_string())
    .chain(args.iter().cloned())
    .collect::<Vec<_>>()
    .join(" ");
  info!(cmd = %cmd, "executing command");

  let mut command = Command::new(program);
  command.args(args);
  if let Some(dir) = cwd {
    command.current_dir(dir);
  }

  debug!(working_dir = ?cwd, "spawning process");
  let output = command.output()?;

  let stdout = String::from_utf8_lossy(&output.stdout);
  if !stdout.trim().is_empty() {
    debug!(stdout = %stdout, "command stdout");
  }

  if !output.status.success() {
    return Err(ExternalError::CmdFailed {
      cmd,
      code: output.status.code(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    });
  }

  Ok(stdout.trim().to_string())
}
