//! Patch application and literal source edits.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::process::run_command;
use super::{ExternalError, Patcher};
use crate::recipe::{Recipe, SourceEdit};

/// Applies `*.patch` files with the `patch` program.
///
/// The patch directory mirrors the source tree: `patches/a/b/fix.patch` is
/// applied with `source/a/b` as its base. Patches run in sorted path order.
#[derive(Debug, Clone)]
pub struct DirPatcher {
  pub program: String,
  /// Leading path components stripped from file names in patches (`-p`).
  pub strip: u32,
}

impl Default for DirPatcher {
  fn default() -> Self {
    Self {
      program: "patch".to_string(),
      strip: 0,
    }
  }
}

impl DirPatcher {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Patcher for DirPatcher {
  fn apply(&self, recipe: &Recipe, source_dir: &Path) -> Result<(), ExternalError> {
    if let Some(patches_dir) = &recipe.patches_dir {
      for (patch, base) in patch_plan(patches_dir, source_dir)? {
        info!(patch = %patch.display(), base = %base.display(), "applying patch");
        let args = vec![
          format!("-p{}", self.strip),
          "-i".to_string(),
          patch.display().to_string(),
        ];
        run_command(&self.program, &args, Some(&base))?;
      }
    }

    for edit in &recipe.source_edits {
      apply_edit(edit, source_dir)?;
    }
    Ok(())
  }
}

/// Patch files under `patches_dir` paired with the directory each applies to.
pub fn patch_plan(patches_dir: &Path, source_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>, ExternalError> {
  let mut plan = Vec::new();
  for entry in WalkDir::new(patches_dir).sort_by_file_name() {
    let entry = entry.map_err(|e| ExternalError::Io(e.into()))?;
    if !entry.file_type().is_file() || entry.path().extension().is_none_or(|ext| ext != "patch") {
      continue;
    }
    let parent = entry.path().parent().unwrap_or(patches_dir);
    let relative = parent.strip_prefix(patches_dir).unwrap_or(Path::new(""));
    let patch = fs::canonicalize(entry.path())?;
    plan.push((patch, source_dir.join(relative)));
  }
  debug!(count = plan.len(), "planned patches");
  Ok(plan)
}

/// Replace every occurrence of the edit's search text in its file.
pub fn apply_edit(edit: &SourceEdit, source_dir: &Path) -> Result<(), ExternalError> {
  let path = source_dir.join(&edit.file);
  let content = fs::read_to_string(&path)?;
  if !content.contains(&edit.search) {
    return Err(ExternalError::EditNotFound {
      file: path.display().to_string(),
      search: edit.search.clone(),
    });
  }
  fs::write(&path, content.replace(&edit.search, &edit.replace))?;
  debug!(file = %path.display(), "applied source edit");
  Ok(())
}
