//! Package identity and source acquisition facts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A literal text replacement applied to the source tree after patching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEdit {
  /// File path relative to the source root.
  pub file: PathBuf,
  pub search: String,
  pub replace: String,
}

/// Static description of the package being produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
  pub name: String,
  pub version: String,
  pub description: String,
  pub homepage: String,
  pub license: String,
  pub source_url: String,
  pub sha256: Option<String>,
  /// Directory name the unpacked source tree is normalized to.
  pub source_folder: String,
  /// Place headers under `include/OGRE` rather than `include`.
  pub nest_includes: bool,
  pub patches_dir: Option<PathBuf>,
  pub source_edits: Vec<SourceEdit>,
}

impl Default for Recipe {
  fn default() -> Self {
    Self {
      name: "OGRE".to_string(),
      version: "2.1.0".to_string(),
      description: "Open Source 3D Graphics Engine".to_string(),
      homepage: "http://github.com/sixten-hilborn/conan-ogre".to_string(),
      license: "https://opensource.org/licenses/mit-license.php".to_string(),
      source_url: "https://bitbucket.org/sinbad/ogre/get/v2-1.zip".to_string(),
      sha256: None,
      source_folder: "ogre-v2.1".to_string(),
      nest_includes: true,
      patches_dir: None,
      source_edits: vec![SourceEdit {
        file: PathBuf::from("Components/Overlay/CMakeLists.txt"),
        search: "target_link_libraries(OgreOverlay OgreMain ${FREETYPE_LIBRARIES})".to_string(),
        replace: "target_link_libraries(OgreOverlay OgreMain ${FREETYPE_LIBRARIES} ${CONAN_LIBS_BZIP2} ${CONAN_LIBS_LIBPNG} ${CONAN_LIBS_ZLIB})".to_string(),
      }],
    }
  }
}

/// Fields of a recipe that a profile may override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeOverrides {
  pub version: Option<String>,
  pub source_url: Option<String>,
  pub sha256: Option<String>,
  pub source_folder: Option<String>,
  pub nest_includes: Option<bool>,
  pub patches_dir: Option<PathBuf>,
  pub source_edits: Option<Vec<SourceEdit>>,
}

impl Recipe {
  /// Apply profile overrides on top of this recipe.
  pub fn with_overrides(mut self, overrides: RecipeOverrides) -> Self {
    if let Some(version) = overrides.version {
      self.version = version;
    }
    if let Some(url) = overrides.source_url {
      self.source_url = url;
    }
    if overrides.sha256.is_some() {
      self.sha256 = overrides.sha256;
    }
    if let Some(folder) = overrides.source_folder {
      self.source_folder = folder;
    }
    if let Some(nest) = overrides.nest_includes {
      self.nest_includes = nest;
    }
    if overrides.patches_dir.is_some() {
      self.patches_dir = overrides.patches_dir;
    }
    if let Some(edits) = overrides.source_edits {
      self.source_edits = edits;
    }
    self
  }

  /// The `name/version` reference of the package.
  pub fn reference(&self) -> String {
    format!("{}/{}", self.name, self.version)
  }
}
