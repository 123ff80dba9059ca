//! Source archive acquisition.
//!
//! Downloads the recipe's source archive, verifies its SHA-256 when the recipe
//! pins one, unpacks it and normalizes the single top-level directory the
//! archive contains to the recipe's `source_folder`.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::{ExternalError, SourceFetcher};
use crate::recipe::Recipe;

/// Fetches zip archives over HTTP(S), or from `file://` URLs.
#[derive(Debug, Clone, Default)]
pub struct ArchiveFetcher;

impl ArchiveFetcher {
  pub fn new() -> Self {
    Self
  }

  /// Fetch the archive into `downloads_dir`, reusing a cached copy whose hash matches.
  fn download(&self, url: &str, expected_sha256: Option<&str>, downloads_dir: &Path) -> Result<PathBuf, ExternalError> {
    fs::create_dir_all(downloads_dir)?;
    let dest_path = downloads_dir.join(url_to_filename(url));

    if let Some(expected) = expected_sha256
      && dest_path.exists()
    {
      debug!(path = ?dest_path, "checking cached archive");
      let actual = hash_bytes(&fs::read(&dest_path)?);
      if actual == expected {
        info!(path = ?dest_path, "using cached archive");
        return Ok(dest_path);
      }
      debug!(expected = %expected, actual = %actual, "cached archive hash mismatch, re-downloading");
    }

    info!(url = %url, "fetching source archive");
    let bytes = match url.strip_prefix("file://") {
      Some(path) => fs::read(path).map_err(|e| ExternalError::FetchFailed {
        url: url.to_string(),
        message: e.to_string(),
      })?,
      None => http_get(url)?,
    };

    if let Some(expected) = expected_sha256 {
      let actual = hash_bytes(&bytes);
      if actual != expected {
        return Err(ExternalError::HashMismatch {
          url: url.to_string(),
          expected: expected.to_string(),
          actual,
        });
      }
    }

    fs::write(&dest_path, &bytes)?;
    info!(path = ?dest_path, size = bytes.len(), "download complete");
    Ok(dest_path)
  }
}

impl SourceFetcher for ArchiveFetcher {
  fn fetch(&self, recipe: &Recipe, work_dir: &Path) -> Result<PathBuf, ExternalError> {
    let archive = self.download(&recipe.source_url, recipe.sha256.as_deref(), &work_dir.join("downloads"))?;

    let staging = tempfile::Builder::new().prefix("unpack").tempdir_in(work_dir)?;
    unpack_zip(&archive, staging.path())?;

    let top_level = single_top_level_dir(staging.path())?;
    let source_dir = work_dir.join(&recipe.source_folder);
    if source_dir.exists() {
      fs::remove_dir_all(&source_dir)?;
    }
    fs::rename(&top_level, &source_dir)?;

    info!(path = %source_dir.display(), "source tree ready");
    Ok(source_dir)
  }
}

fn http_get(url: &str) -> Result<Vec<u8>, ExternalError> {
  let failed = |message: String| ExternalError::FetchFailed {
    url: url.to_string(),
    message,
  };

  let response = reqwest::blocking::get(url).map_err(|e| failed(e.to_string()))?;
  if !response.status().is_success() {
    return Err(failed(format!("HTTP {}", response.status())));
  }
  let bytes = response.bytes().map_err(|e| failed(e.to_string()))?;
  Ok(bytes.to_vec())
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<(), ExternalError> {
  let unpack_failed = |message: String| ExternalError::Unpack {
    path: archive.display().to_string(),
    message,
  };

  let file = fs::File::open(archive)?;
  let mut zip = zip::ZipArchive::new(file).map_err(|e| unpack_failed(e.to_string()))?;
  zip.extract(dest).map_err(|e| unpack_failed(e.to_string()))?;
  debug!(entries = zip.len(), dest = %dest.display(), "archive unpacked");
  Ok(())
}

/// The archive's lone top-level directory, or the staging dir itself if it has several entries.
fn single_top_level_dir(staging: &Path) -> Result<PathBuf, ExternalError> {
  let entries: Vec<PathBuf> = fs::read_dir(staging)?
    .filter_map(|entry| entry.ok().map(|e| e.path()))
    .collect();

  match entries.as_slice() {
    [only] if only.is_dir() => Ok(only.clone()),
    _ => Ok(staging.to_path_buf()),
  }
}

fn hash_bytes(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}

/// Convert a URL to a safe file name.
///
/// Takes the last path component and sanitizes it, falling back to a hash of the
/// URL when nothing usable remains.
fn url_to_filename(url: &str) -> String {
  let last = url.rsplit('/').next().unwrap_or(url);
  let last = last.split('?').next().unwrap_or(last);

  let sanitized: String = last
    .chars()
    .map(|c| {
      if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
        c
      } else {
        '_'
      }
    })
    .collect();

  if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
    hash_bytes(url.as_bytes())[..16].to_string()
  } else {
    sanitized
  }
}
