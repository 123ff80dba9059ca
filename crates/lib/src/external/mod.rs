//! External collaborators.
//!
//! Source acquisition, patching, the native build and system package
//! installation are plain I/O or process invocation. Each sits behind a trait so
//! the pipeline can run against fakes; the default implementations shell out or
//! download the way a packaging tool would.

pub mod cmake;
pub mod fetch;
pub mod patch;
pub mod process;
pub mod system;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use cmake::CMakeTool;
pub use fetch::ArchiveFetcher;
pub use patch::DirPatcher;
pub use system::AptPackager;

use crate::platform::PlatformDescriptor;
use crate::recipe::Recipe;
use crate::translate::BuildConfig;

/// Failures reported by external collaborators.
#[derive(Debug, Error)]
pub enum ExternalError {
  #[error("fetch failed for {url}: {message}")]
  FetchFailed { url: String, message: String },

  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  #[error("failed to unpack {path}: {message}")]
  Unpack { path: String, message: String },

  #[error("search text not found in {file}: {search}")]
  EditNotFound { file: String, search: String },

  #[error("command failed with exit code {code:?}: {cmd}\n{stderr}")]
  CmdFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Produces an unpacked source tree for a recipe.
pub trait SourceFetcher {
  /// Fetch into `work_dir`, returning the source root.
  fn fetch(&self, recipe: &Recipe, work_dir: &Path) -> Result<PathBuf, ExternalError>;
}

/// Applies the recipe's patches and source edits to a source tree.
pub trait Patcher {
  fn apply(&self, recipe: &Recipe, source_dir: &Path) -> Result<(), ExternalError>;
}

/// Everything the native build tool needs for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct BuildInvocation<'a> {
  pub source_dir: &'a Path,
  pub build_dir: &'a Path,
  pub install_dir: &'a Path,
  pub config: &'a BuildConfig,
  /// Build tool target, `install` for packaging runs.
  pub target: &'a str,
  pub platform: &'a PlatformDescriptor,
}

/// Runs the native build.
pub trait BuildTool {
  fn build(&self, invocation: &BuildInvocation<'_>) -> Result<(), ExternalError>;
}

/// Installs host packages the native build depends on.
pub trait SystemPackager {
  fn install(&self, packages: &[String]) -> Result<(), ExternalError>;
}
