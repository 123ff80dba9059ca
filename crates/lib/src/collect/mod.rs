//! Artifact collection and package manifests.
//!
//! After the native build installs into its output root, [`collect`] copies the
//! files selected by each [`ArtifactRule`] into the package root and pairs the
//! result with [`LinkMetadata`] computed from options and platform.
//!
//! A rule whose source directory does not exist is not an error: not every
//! platform produces every artifact class. It is recorded as a
//! [`PackagingWarning`] and collection moves on.

pub mod check;
pub mod link;
pub mod pattern;
pub mod rules;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub use check::{ConsistencyPolicy, MetadataInconsistency, check_consistency, enforce};
pub use link::{LinkMetadata, link_metadata};
pub use rules::{ArtifactRule, artifact_rules};

use crate::options::OptionSet;
use crate::platform::PlatformDescriptor;

/// Errors that abort packaging.
#[derive(Debug, Error)]
pub enum CollectError {
  #[error("failed to copy {from} to {to}: {source}")]
  Copy {
    from: String,
    to: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to create directory {path}: {source}")]
  CreateDir {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to traverse {path}: {source}")]
  WalkDir {
    path: String,
    #[source]
    source: walkdir::Error,
  },

  #[error("link metadata does not match package contents ({} finding(s))", .0.len())]
  Inconsistent(Vec<MetadataInconsistency>),
}

/// Non-fatal conditions met while collecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackagingWarning {
  MissingSource { pattern: String, path: PathBuf },
}

/// One file copied into the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedFile {
  /// Pattern of the rule that selected the file.
  pub pattern: String,
  pub source: PathBuf,
  /// Path relative to the package root.
  pub destination: PathBuf,
}

/// The realized package: copied files plus consumer metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
  pub platform: PlatformDescriptor,
  pub options: OptionSet,
  pub files: Vec<CollectedFile>,
  pub warnings: Vec<PackagingWarning>,
  pub link: LinkMetadata,
}

impl PackageManifest {
  /// Files collected by the rule with the given pattern.
  pub fn files_for<'a>(&'a self, pattern: &'a str) -> impl Iterator<Item = &'a CollectedFile> + 'a {
    self.files.iter().filter(move |f| f.pattern == pattern)
  }

  /// Compare the link metadata against the collected files.
  pub fn inconsistencies(&self) -> Vec<MetadataInconsistency> {
    check_consistency(&self.link, &self.files)
  }
}

/// Copy the artifacts selected by `rules` from `build_root` into `package_root`.
pub fn collect(
  build_root: &Path,
  package_root: &Path,
  rules: &[ArtifactRule],
  options: &OptionSet,
  platform: &PlatformDescriptor,
) -> Result<PackageManifest, CollectError> {
  let mut files = Vec::new();
  let mut warnings = Vec::new();

  for rule in rules {
    let src_dir = build_root.join(&rule.src);
    if !src_dir.is_dir() {
      warn!(pattern = %rule.pattern, path = %src_dir.display(), "artifact source missing, nothing to collect");
      warnings.push(PackagingWarning::MissingSource {
        pattern: rule.pattern.clone(),
        path: src_dir,
      });
      continue;
    }

    let copied = collect_rule(rule, &src_dir, package_root)?;
    debug!(pattern = %rule.pattern, count = copied.len(), "collected artifacts");
    files.extend(copied);
  }

  info!(files = files.len(), warnings = warnings.len(), "collection complete");

  Ok(PackageManifest {
    platform: *platform,
    options: options.clone(),
    files,
    warnings,
    link: link_metadata(options, platform),
  })
}

fn collect_rule(rule: &ArtifactRule, src_dir: &Path, package_root: &Path) -> Result<Vec<CollectedFile>, CollectError> {
  let mut copied = Vec::new();
  let walker = WalkDir::new(src_dir).follow_links(rule.follow_symlinks).sort_by_file_name();

  for entry in walker {
    let entry = entry.map_err(|e| CollectError::WalkDir {
      path: src_dir.display().to_string(),
      source: e,
    })?;
    let file_type = entry.file_type();
    let keep_link = file_type.is_symlink() && !rule.follow_symlinks;
    if file_type.is_dir() || (keep_link && rule.flatten) {
      continue;
    }

    let Some(name) = entry.file_name().to_str() else {
      continue;
    };
    if !pattern::matches(&rule.pattern, name) {
      continue;
    }

    let relative = if rule.flatten {
      PathBuf::from(name)
    } else {
      entry.path().strip_prefix(src_dir).unwrap_or(entry.path()).to_path_buf()
    };
    let destination = rule.dst.join(relative);
    if keep_link {
      copy_symlink(entry.path(), &package_root.join(&destination))?;
    } else {
      copy_file(entry.path(), &package_root.join(&destination))?;
    }

    copied.push(CollectedFile {
      pattern: rule.pattern.clone(),
      source: entry.path().to_path_buf(),
      destination,
    });
  }

  Ok(copied)
}

fn create_parent(to: &Path) -> Result<(), CollectError> {
  if let Some(parent) = to.parent() {
    fs::create_dir_all(parent).map_err(|e| CollectError::CreateDir {
      path: parent.display().to_string(),
      source: e,
    })?;
  }
  Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<(), CollectError> {
  create_parent(to)?;
  fs::copy(from, to).map_err(|e| CollectError::Copy {
    from: from.display().to_string(),
    to: to.display().to_string(),
    source: e,
  })?;
  Ok(())
}

/// Recreate the link at `from` as an identical link at `to`, keeping its target verbatim.
#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), CollectError> {
  create_parent(to)?;
  let copy_failed = |source| CollectError::Copy {
    from: from.display().to_string(),
    to: to.display().to_string(),
    source,
  };

  let target = fs::read_link(from).map_err(copy_failed)?;
  if to.symlink_metadata().is_ok() {
    fs::remove_file(to).map_err(copy_failed)?;
  }
  std::os::unix::fs::symlink(&target, to).map_err(copy_failed)?;
  debug!(link = %to.display(), target = %target.display(), "recreated symlink");
  Ok(())
}

/// Without portable symlinks, copy the file a link resolves to.
#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), CollectError> {
  if from.is_file() {
    copy_file(from, to)
  } else {
    Ok(())
  }
}
