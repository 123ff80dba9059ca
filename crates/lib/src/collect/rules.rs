//! Artifact rules: which files of the install tree end up where in the package.

use std::path::PathBuf;

use serde::Serialize;

use crate::platform::{Os, PlatformDescriptor};

/// Product subdirectory headers are installed under.
pub const INCLUDE_SUBDIR: &str = "OGRE";

/// One class of files to collect after the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRule {
  /// File name pattern (`*` and `?` wildcards).
  pub pattern: String,
  /// Destination directory, relative to the package root.
  pub dst: PathBuf,
  /// Source directory, relative to the build output root.
  pub src: PathBuf,
  /// Drop the relative path below `src` and place files directly in `dst`.
  pub flatten: bool,
  /// Descend through and copy symlinked entries. Otherwise links are recreated as
  /// links when paths are preserved, and skipped when flattening.
  pub follow_symlinks: bool,
}

impl ArtifactRule {
  pub fn new(pattern: &str, dst: impl Into<PathBuf>, src: impl Into<PathBuf>) -> Self {
    Self {
      pattern: pattern.to_string(),
      dst: dst.into(),
      src: src.into(),
      flatten: false,
      follow_symlinks: false,
    }
  }

  pub fn flatten(mut self) -> Self {
    self.flatten = true;
    self
  }

  pub fn follow_symlinks(mut self) -> Self {
    self.follow_symlinks = true;
    self
  }
}

/// The fixed rule list for a platform.
///
/// With `nest_includes` headers are placed under `include/OGRE`, otherwise
/// directly under `include`.
pub fn artifact_rules(platform: &PlatformDescriptor, nest_includes: bool) -> Vec<ArtifactRule> {
  let include_src = PathBuf::from("include").join(INCLUDE_SUBDIR);
  let include_dst = if nest_includes {
    include_src.clone()
  } else {
    PathBuf::from("include")
  };

  let mut rules = vec![
    ArtifactRule::new("*.h", &include_dst, &include_src),
    ArtifactRule::new("*.inl", &include_dst, &include_src),
    ArtifactRule::new("*.lib", "lib", "lib").flatten(),
    ArtifactRule::new("*.a", "lib", "lib").flatten(),
    ArtifactRule::new("*.so*", "lib", "lib").flatten().follow_symlinks(),
    ArtifactRule::new("*.dylib", "lib", "lib").flatten().follow_symlinks(),
    ArtifactRule::new("*.dll", "bin", "bin").flatten(),
  ];

  if platform.os == Os::Macos {
    rules.push(ArtifactRule::new("*", "Frameworks", PathBuf::from("lib").join("macosx")));
  }

  rules
}
