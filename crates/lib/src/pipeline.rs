//! End-to-end packaging run.
//!
//! [`Pipeline::run`] drives one invocation through its stages in strict order:
//!
//! 1. Resolve options and dependencies (configuration errors stop here)
//! 2. Install host packages, if enabled (best effort)
//! 3. Fetch the source tree
//! 4. Apply patches and source edits
//! 5. Translate options into build configuration
//! 6. Build and install
//! 7. Collect artifacts into the package root
//! 8. Check link metadata against the collected files
//! 9. Write `manifest.json`
//!
//! The first failure ends the run. Nothing is retried and nothing is persisted
//! between runs apart from the work directory contents.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collect::{self, CollectError, ConsistencyPolicy, PackageManifest, artifact_rules};
use crate::external::{BuildInvocation, BuildTool, ExternalError, Patcher, SourceFetcher, SystemPackager};
use crate::options::{OptionError, OptionSet};
use crate::platform::PlatformDescriptor;
use crate::recipe::Recipe;
use crate::resolve::{self, Resolution, system_packages};
use crate::translate::{BuildConfig, translate};

/// File name of the manifest written into the package root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Build target used for packaging runs.
pub const INSTALL_TARGET: &str = "install";

/// Errors that halt a packaging run.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("configuration error: {0}")]
  Configuration(#[from] OptionError),

  #[error("source fetch failed: {0}")]
  Fetch(#[source] ExternalError),

  #[error("patch failed: {0}")]
  Patch(#[source] ExternalError),

  #[error("build failed: {0}")]
  Build(#[source] ExternalError),

  #[error("packaging failed: {0}")]
  Collect(#[from] CollectError),

  #[error("failed to write manifest {path}: {source}")]
  WriteManifest {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to prepare package directory {path}: {source}")]
  PackageDir {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to serialize manifest: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Inputs for one packaging run.
#[derive(Debug, Clone)]
pub struct PackageRequest {
  pub recipe: Recipe,
  pub platform: PlatformDescriptor,
  /// Options as requested, before platform overrides.
  pub requested: OptionSet,
  /// Scratch space for downloads, source and build trees.
  pub work_dir: PathBuf,
  /// Destination of the package layout and its manifest.
  pub package_dir: PathBuf,
}

impl PackageRequest {
  pub fn build_dir(&self) -> PathBuf {
    self.work_dir.join("_build")
  }

  /// Install prefix handed to the build tool and collected from afterwards.
  pub fn install_dir(&self) -> PathBuf {
    self.build_dir().join("install")
  }
}

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PackageOutcome {
  pub resolution: Resolution,
  pub config: BuildConfig,
  pub manifest: PackageManifest,
  pub manifest_path: PathBuf,
}

/// The packaging pipeline over a set of external collaborators.
pub struct Pipeline<'a> {
  fetcher: &'a dyn SourceFetcher,
  patcher: &'a dyn Patcher,
  build_tool: &'a dyn BuildTool,
  system_packager: Option<&'a dyn SystemPackager>,
  policy: ConsistencyPolicy,
}

impl<'a> Pipeline<'a> {
  pub fn new(fetcher: &'a dyn SourceFetcher, patcher: &'a dyn Patcher, build_tool: &'a dyn BuildTool) -> Self {
    Self {
      fetcher,
      patcher,
      build_tool,
      system_packager: None,
      policy: ConsistencyPolicy::default(),
    }
  }

  /// Install host packages before fetching.
  pub fn with_system_packager(mut self, packager: &'a dyn SystemPackager) -> Self {
    self.system_packager = Some(packager);
    self
  }

  pub fn with_policy(mut self, policy: ConsistencyPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Run every stage for `request`.
  pub fn run(&self, request: &PackageRequest) -> Result<PackageOutcome, PipelineError> {
    let platform = &request.platform;
    info!(recipe = %request.recipe.reference(), platform = %platform, "starting packaging run");

    let resolution = resolve::resolve(&request.requested, platform)?;
    for dependency in &resolution.dependencies {
      debug!(dependency = %dependency, private = dependency.private, "requires");
    }

    if let Some(packager) = self.system_packager {
      let packages = system_packages(platform);
      if let Err(e) = packager.install(&packages) {
        warn!(error = %e, "system package installation failed, continuing");
      }
    }

    let source_dir = self
      .fetcher
      .fetch(&request.recipe, &request.work_dir)
      .map_err(PipelineError::Fetch)?;

    self
      .patcher
      .apply(&request.recipe, &source_dir)
      .map_err(PipelineError::Patch)?;

    let config = translate(&resolution.options, platform);

    let build_dir = request.build_dir();
    let install_dir = request.install_dir();
    let invocation = BuildInvocation {
      source_dir: &source_dir,
      build_dir: &build_dir,
      install_dir: &install_dir,
      config: &config,
      target: INSTALL_TARGET,
      platform,
    };
    self.build_tool.build(&invocation).map_err(PipelineError::Build)?;

    let (manifest, manifest_path) = package(
      &install_dir,
      &request.package_dir,
      &request.recipe,
      &resolution.options,
      platform,
      self.policy,
    )?;

    Ok(PackageOutcome {
      resolution,
      config,
      manifest,
      manifest_path,
    })
  }
}

/// Collect an existing install tree into `package_dir` and write its manifest.
///
/// `options` must already be resolved. Files are staged next to `package_dir`
/// and only replace it once every check has passed, so a failed run leaves the
/// previous contents untouched and a successful one leaves no stale files.
pub fn package(
  install_dir: &Path,
  package_dir: &Path,
  recipe: &Recipe,
  options: &OptionSet,
  platform: &PlatformDescriptor,
  policy: ConsistencyPolicy,
) -> Result<(PackageManifest, PathBuf), PipelineError> {
  let staging = staging_dir(package_dir)?;
  debug!(path = %staging.path().display(), "staging package");

  let rules = artifact_rules(platform, recipe.nest_includes);
  let manifest = collect::collect(install_dir, staging.path(), &rules, options, platform)?;
  collect::enforce(&manifest.inconsistencies(), policy)?;
  write_manifest(&manifest, staging.path())?;

  publish(staging, package_dir)?;
  let manifest_path = package_dir.join(MANIFEST_FILE);
  info!(path = %manifest_path.display(), files = manifest.files.len(), "package ready");
  Ok((manifest, manifest_path))
}

fn package_dir_failed(path: &Path) -> impl Fn(std::io::Error) -> PipelineError + '_ {
  move |source| PipelineError::PackageDir {
    path: path.display().to_string(),
    source,
  }
}

/// A fresh directory beside `package_dir`, removed on drop.
fn staging_dir(package_dir: &Path) -> Result<TempDir, PipelineError> {
  let parent = package_dir
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .unwrap_or(Path::new("."));
  fs::create_dir_all(parent).map_err(package_dir_failed(parent))?;
  tempfile::Builder::new()
    .prefix(".ogrepkg-staging")
    .tempdir_in(parent)
    .map_err(package_dir_failed(parent))
}

/// Replace `package_dir` with the staged tree.
fn publish(staging: TempDir, package_dir: &Path) -> Result<(), PipelineError> {
  if package_dir.exists() {
    debug!(path = %package_dir.display(), "replacing previous package");
    fs::remove_dir_all(package_dir).map_err(package_dir_failed(package_dir))?;
  }
  fs::rename(staging.path(), package_dir).map_err(package_dir_failed(package_dir))?;
  Ok(())
}

fn write_manifest(manifest: &PackageManifest, package_dir: &Path) -> Result<PathBuf, PipelineError> {
  let path = package_dir.join(MANIFEST_FILE);
  let write_failed = |source| PipelineError::WriteManifest {
    path: path.display().to_string(),
    source,
  };

  let json = serde_json::to_string_pretty(manifest)?;
  fs::write(&path, json).map_err(write_failed)?;
  Ok(path)
}
