//! Profiles: the configuration surface of a packaging run.
//!
//! A profile is a TOML document with three optional tables:
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//! compiler = "gcc"
//! build_type = "Debug"
//!
//! [options]
//! shared = false
//! hlms_type = "mobile"
//! "SDL2:x11_video" = "True"
//!
//! [recipe]
//! nest_includes = false
//! ```
//!
//! Settings left unset fall back to the host platform. Command-line
//! `key=value` assignments are layered on top of whatever the file declares.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::options::{OptionError, OptionSet};
use crate::platform::{Arch, BuildType, Compiler, Os, PlatformDescriptor, PlatformError};
use crate::recipe::{Recipe, RecipeOverrides};

/// Errors loading or interpreting a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
  #[error("failed to read profile {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse profile {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },

  #[error("unknown setting '{0}' (expected os, arch, compiler or build_type)")]
  UnknownSetting(String),

  #[error(transparent)]
  Platform(#[from] PlatformError),

  #[error(transparent)]
  Option(#[from] OptionError),
}

/// A raw option value as written in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
  Bool(bool),
  Int(i64),
  Str(String),
}

impl RawValue {
  fn into_string(self) -> String {
    match self {
      RawValue::Bool(true) => "True".to_string(),
      RawValue::Bool(false) => "False".to_string(),
      RawValue::Int(i) => i.to_string(),
      RawValue::Str(s) => s,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
  pub os: Option<String>,
  pub arch: Option<String>,
  pub compiler: Option<String>,
  pub build_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
  #[serde(default)]
  pub settings: Settings,
  #[serde(default)]
  pub options: BTreeMap<String, RawValue>,
  #[serde(default)]
  pub recipe: RecipeOverrides,
}

impl Profile {
  /// Load a profile from a TOML file.
  pub fn load(path: &Path) -> Result<Self, ProfileError> {
    let content = fs::read_to_string(path).map_err(|e| ProfileError::Read {
      path: path.display().to_string(),
      source: e,
    })?;
    let profile = Self::parse(&content).map_err(|e| ProfileError::Parse {
      path: path.display().to_string(),
      source: e,
    })?;
    debug!(path = %path.display(), options = profile.options.len(), "loaded profile");
    Ok(profile)
  }

  pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }

  /// Apply a `name=value` setting assignment.
  pub fn set_setting(&mut self, assignment: &str) -> Result<(), ProfileError> {
    let (name, value) = OptionSet::parse_assignment(assignment)?;
    let slot = match name.as_str() {
      "os" => &mut self.settings.os,
      "arch" => &mut self.settings.arch,
      "compiler" => &mut self.settings.compiler,
      "build_type" => &mut self.settings.build_type,
      _ => return Err(ProfileError::UnknownSetting(name)),
    };
    *slot = Some(value);
    Ok(())
  }

  /// Apply a `name=value` option assignment.
  pub fn set_option(&mut self, assignment: &str) -> Result<(), ProfileError> {
    let (name, value) = OptionSet::parse_assignment(assignment)?;
    self.options.insert(name, RawValue::Str(value));
    Ok(())
  }

  /// The target platform; unset settings fall back to the host.
  pub fn platform(&self) -> Result<PlatformDescriptor, ProfileError> {
    let settings = &self.settings;

    let os = match &settings.os {
      Some(os) => os.parse::<Os>()?,
      None => PlatformDescriptor::current()?.os,
    };
    let arch = match &settings.arch {
      Some(arch) => arch.parse::<Arch>()?,
      None => PlatformDescriptor::current()?.arch,
    };
    let compiler = match &settings.compiler {
      Some(compiler) => compiler.parse::<Compiler>()?,
      None => Compiler::default_for(os),
    };
    let build_type = match &settings.build_type {
      Some(build_type) => build_type.parse::<BuildType>()?,
      None => BuildType::default(),
    };

    Ok(PlatformDescriptor::new(os, arch, compiler, build_type))
  }

  /// The requested options, validated against the schema.
  pub fn requested_options(&self) -> Result<OptionSet, OptionError> {
    let pairs: Vec<(String, String)> = self
      .options
      .iter()
      .map(|(name, value)| (name.clone(), value.clone().into_string()))
      .collect();
    OptionSet::from_requested(pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())))
  }

  /// The default recipe with this profile's overrides applied.
  pub fn recipe(&self) -> Recipe {
    Recipe::default().with_overrides(self.recipe.clone())
  }
}
