//! Drift detection between link metadata and collected files.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use super::CollectedFile;
use super::link::{LinkMetadata, SYSTEM_LIBS};

/// How inconsistencies between metadata and package contents are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsistencyPolicy {
  /// Log each finding and carry on.
  #[default]
  Warn,
  /// Fail packaging if there is any finding.
  Deny,
}

/// A mismatch between computed library names and packaged files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetadataInconsistency {
  /// A library the metadata names has no packaged file.
  MissingLibrary { name: String },
  /// A packaged library file whose name the metadata does not list.
  UnlistedLibrary { file: String },
}

impl fmt::Display for MetadataInconsistency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MetadataInconsistency::MissingLibrary { name } => write!(f, "library '{}' is listed but was not packaged", name),
      MetadataInconsistency::UnlistedLibrary { file } => write!(f, "packaged file '{}' is not listed", file),
    }
  }
}

/// Library name a packaged file provides, if it looks like a library at all.
///
/// `libOgreMain.so.2.1` and `libOgreMain.a` give `OgreMain`; `OgreMain_d.lib` gives `OgreMain_d`.
pub fn library_stem(file_name: &str) -> Option<&str> {
  if let Some(stem) = file_name.strip_suffix(".lib").or_else(|| file_name.strip_suffix(".dll")) {
    return Some(stem);
  }
  let unix_stem = if let Some(stem) = file_name.strip_suffix(".a") {
    stem
  } else if let Some(stem) = file_name.strip_suffix(".dylib") {
    strip_version(stem)
  } else if let Some(idx) = file_name.find(".so") {
    let rest = &file_name[idx + 3..];
    if !(rest.is_empty() || rest.starts_with('.')) {
      return None;
    }
    &file_name[..idx]
  } else {
    return None;
  };
  Some(unix_stem.strip_prefix("lib").unwrap_or(unix_stem))
}

/// Drop trailing numeric segments, as in `libOgreMain.2.1.0`.
fn strip_version(stem: &str) -> &str {
  let mut stem = stem;
  while let Some((head, tail)) = stem.rsplit_once('.')
    && !tail.is_empty()
    && tail.bytes().all(|b| b.is_ascii_digit())
  {
    stem = head;
  }
  stem
}

/// Name of the framework bundle a packaged file belongs to, if any.
fn framework_name(destination: &Path) -> Option<String> {
  destination
    .components()
    .filter_map(|c| c.as_os_str().to_str())
    .find_map(|c| c.strip_suffix(".framework"))
    .map(str::to_string)
}

/// Compare metadata against collected files in both directions.
pub fn check_consistency(link: &LinkMetadata, files: &[CollectedFile]) -> Vec<MetadataInconsistency> {
  let mut provided = BTreeSet::new();
  let mut library_files = Vec::new();

  for file in files {
    let dest = &file.destination;
    let top = dest.components().next().and_then(|c| c.as_os_str().to_str());
    match top {
      Some("lib") | Some("bin") => {
        if let Some(stem) = dest.file_name().and_then(|n| n.to_str()).and_then(library_stem) {
          provided.insert(stem.to_string());
          // Only lib/ is authoritative for unlisted files; bin/ holds runtime DLLs
          if top == Some("lib") {
            library_files.push((stem.to_string(), dest.display().to_string()));
          }
        }
      }
      Some("Frameworks") => {
        if let Some(name) = framework_name(dest) {
          provided.insert(name);
        }
      }
      _ => {}
    }
  }

  let listed: BTreeSet<&str> = link.libs.iter().map(String::as_str).collect();
  let mut findings = Vec::new();

  for name in &link.libs {
    if SYSTEM_LIBS.contains(&name.as_str()) {
      continue;
    }
    if !provided.contains(name) {
      findings.push(MetadataInconsistency::MissingLibrary { name: name.clone() });
    }
  }

  let mut reported = BTreeSet::new();
  for (stem, file) in library_files {
    if !listed.contains(stem.as_str()) && reported.insert(file.clone()) {
      findings.push(MetadataInconsistency::UnlistedLibrary { file });
    }
  }

  findings
}

/// Apply a policy to findings: warn about each, and fail under [`ConsistencyPolicy::Deny`].
pub fn enforce(findings: &[MetadataInconsistency], policy: ConsistencyPolicy) -> Result<(), super::CollectError> {
  for finding in findings {
    warn!(%finding, "link metadata inconsistency");
  }
  if policy == ConsistencyPolicy::Deny && !findings.is_empty() {
    return Err(super::CollectError::Inconsistent(findings.to_vec()));
  }
  Ok(())
}
