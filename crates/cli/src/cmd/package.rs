//! Implementation of the `ogrepkg package` command.
//!
//! Collects an install tree produced by an earlier native build into the
//! package layout and writes its manifest, without fetching or building.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ogrepkg_lib::collect::{ConsistencyPolicy, PackageManifest, PackagingWarning};
use ogrepkg_lib::pipeline::package;
use ogrepkg_lib::profile::Profile;

use super::resolve_profile;
use crate::output::{OutputFormat, print_json, print_stat, print_success, print_warning};

#[derive(Args, Debug, Clone)]
pub struct PackageArgs {
  /// Install tree of a finished build
  #[arg(long, default_value = ".ogrepkg/_build/install")]
  pub install_dir: PathBuf,

  /// Package destination
  #[arg(long, default_value = "package")]
  pub package_dir: PathBuf,

  /// Fail when link metadata and packaged files disagree
  #[arg(long)]
  pub deny_inconsistent: bool,
}

pub(super) fn policy(deny: bool) -> ConsistencyPolicy {
  if deny {
    ConsistencyPolicy::Deny
  } else {
    ConsistencyPolicy::Warn
  }
}

pub fn cmd_package(profile: &Profile, args: &PackageArgs, format: OutputFormat) -> Result<()> {
  let (platform, resolution) = resolve_profile(profile)?;
  let recipe = profile.recipe();

  let (manifest, manifest_path) = package(
    &args.install_dir,
    &args.package_dir,
    &recipe,
    &resolution.options,
    &platform,
    policy(args.deny_inconsistent),
  )
  .context("Packaging failed")?;

  if format.is_json() {
    return print_json(&manifest);
  }
  print_summary(&manifest);
  print_success(&format!("Manifest written to {}", manifest_path.display()));
  Ok(())
}

/// Human-readable summary of a package manifest.
pub(super) fn print_summary(manifest: &PackageManifest) {
  for warning in &manifest.warnings {
    match warning {
      PackagingWarning::MissingSource { pattern, path } => {
        print_warning(&format!("nothing collected for {} ({} missing)", pattern, path.display()))
      }
    }
  }
  for finding in manifest.inconsistencies() {
    print_warning(&finding.to_string());
  }
  print_stat("Files", &manifest.files.len().to_string());
  print_stat("Libs", &manifest.link.libs.join(" "));
  print_stat("Static", if manifest.link.is_static { "True" } else { "False" });
}
