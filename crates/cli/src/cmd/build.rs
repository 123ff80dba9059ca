//! Implementation of the `ogrepkg build` command.
//!
//! Runs the whole pipeline with the default collaborators: archive download,
//! `patch`, `cmake` and optionally `apt-get`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ogrepkg_lib::external::{AptPackager, ArchiveFetcher, CMakeTool, DirPatcher};
use ogrepkg_lib::pipeline::{PackageRequest, Pipeline};
use ogrepkg_lib::profile::Profile;

use super::package::{policy, print_summary};
use crate::output::{OutputFormat, format_duration, print_json, print_success, print_warning};

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
  /// Scratch directory for downloads, sources and the build tree
  #[arg(long, default_value = ".ogrepkg")]
  pub work_dir: PathBuf,

  /// Package destination
  #[arg(long, default_value = "package")]
  pub package_dir: PathBuf,

  /// Install host development packages first (best effort)
  #[arg(long)]
  pub system_deps: bool,

  /// Fail when link metadata and packaged files disagree
  #[arg(long)]
  pub deny_inconsistent: bool,

  /// Parallel build jobs (gcc only; defaults to available cores)
  #[arg(short, long)]
  pub jobs: Option<usize>,
}

pub fn cmd_build(profile: &Profile, args: &BuildArgs, format: OutputFormat) -> Result<()> {
  let request = PackageRequest {
    recipe: profile.recipe(),
    platform: profile.platform().context("Invalid platform settings")?,
    requested: profile.requested_options().context("Invalid options")?,
    work_dir: args.work_dir.clone(),
    package_dir: args.package_dir.clone(),
  };
  std::fs::create_dir_all(&request.work_dir)
    .with_context(|| format!("Failed to create work directory: {}", request.work_dir.display()))?;

  let fetcher = ArchiveFetcher::new();
  let patcher = DirPatcher::new();
  let mut cmake = CMakeTool::new();
  if let Some(jobs) = args.jobs {
    cmake.jobs = jobs.max(1);
  }
  let apt = AptPackager::new();

  let mut pipeline = Pipeline::new(&fetcher, &patcher, &cmake).with_policy(policy(args.deny_inconsistent));
  if args.system_deps {
    pipeline = pipeline.with_system_packager(&apt);
  }

  let start = Instant::now();
  let outcome = pipeline.run(&request).context("Build failed")?;
  let elapsed = start.elapsed();
  info!(elapsed = ?elapsed, "pipeline finished");

  if format.is_json() {
    return print_json(&outcome);
  }

  for applied in &outcome.resolution.overrides {
    print_warning(&format!("{} forced {} -> {}", applied.option, applied.from, applied.to));
  }
  print_summary(&outcome.manifest);
  print_success(&format!(
    "{} packaged in {} at {}",
    request.recipe.reference(),
    format_duration(elapsed),
    request.package_dir.display()
  ));
  Ok(())
}
