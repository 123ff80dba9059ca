//! Translation of resolved options into native build configuration.
//!
//! The [`BuildConfig`] is a flat key -> scalar mapping handed to the build tool.
//! Each key is produced by one entry of [`CONFIG_RULES`]; a rule that yields
//! `None` leaves its key absent so the tool default applies.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::options::OptionSet;
use crate::platform::{Os, PlatformDescriptor};

/// Linker flag exporting every symbol from executables linked against static archives.
pub const EXPORT_ALL_SYMBOLS_FLAG: &str = "-Wl,--export-dynamic";

/// Language standard the library is compiled against.
pub const CXX_STANDARD: i64 = 11;

/// Keys that are always switched off to keep the package minimal.
pub const DISABLED_COMPONENTS: &[&str] = &[
  "OGRE_BUILD_SAMPLES2",
  "OGRE_INSTALL_SAMPLES",
  "OGRE_BUILD_TESTS",
  "OGRE_BUILD_TOOLS",
  "OGRE_INSTALL_PDB",
];

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
  Bool(bool),
  Int(i64),
  Str(String),
}

impl fmt::Display for ConfigValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigValue::Bool(true) => write!(f, "ON"),
      ConfigValue::Bool(false) => write!(f, "OFF"),
      ConfigValue::Int(i) => write!(f, "{}", i),
      ConfigValue::Str(s) => write!(f, "{}", s),
    }
  }
}

/// Flat configuration for the native build tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildConfig {
  entries: BTreeMap<String, ConfigValue>,
}

impl BuildConfig {
  pub fn get(&self, key: &str) -> Option<&ConfigValue> {
    self.entries.get(key)
  }

  pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
    self.entries.insert(key.into(), value);
  }

  pub fn contains(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  /// Render as `-DKEY=VALUE` arguments.
  pub fn to_defines(&self) -> Vec<String> {
    self.iter().map(|(key, value)| format!("-D{}={}", key, value)).collect()
  }
}

/// Produces one configuration key from options and platform.
#[derive(Debug, Clone, Copy)]
pub struct ConfigRule {
  pub key: &'static str,
  pub value: fn(&OptionSet, &PlatformDescriptor) -> Option<ConfigValue>,
}

fn disabled(_: &OptionSet, _: &PlatformDescriptor) -> Option<ConfigValue> {
  Some(ConfigValue::Bool(false))
}

fn static_build(options: &OptionSet, _: &PlatformDescriptor) -> Option<ConfigValue> {
  Some(ConfigValue::Bool(!options.shared()))
}

fn export_symbols(options: &OptionSet, platform: &PlatformDescriptor) -> Option<ConfigValue> {
  (!options.shared() && platform.os == Os::Linux).then(|| ConfigValue::Str(EXPORT_ALL_SYMBOLS_FLAG.to_string()))
}

fn metal(options: &OptionSet, _: &PlatformDescriptor) -> Option<ConfigValue> {
  Some(ConfigValue::Bool(options.with_metal()))
}

fn cxx_standard(_: &OptionSet, _: &PlatformDescriptor) -> Option<ConfigValue> {
  Some(ConfigValue::Int(CXX_STANDARD))
}

fn boost(options: &OptionSet, _: &PlatformDescriptor) -> Option<ConfigValue> {
  Some(ConfigValue::Bool(options.use_boost()))
}

fn cg_plugin(options: &OptionSet, _: &PlatformDescriptor) -> Option<ConfigValue> {
  Some(ConfigValue::Bool(options.with_cg()))
}

fn build_type(_: &OptionSet, platform: &PlatformDescriptor) -> Option<ConfigValue> {
  Some(ConfigValue::Str(platform.build_type.to_string()))
}

pub const CONFIG_RULES: &[ConfigRule] = &[
  ConfigRule {
    key: "OGRE_BUILD_SAMPLES2",
    value: disabled,
  },
  ConfigRule {
    key: "OGRE_INSTALL_SAMPLES",
    value: disabled,
  },
  ConfigRule {
    key: "OGRE_BUILD_TESTS",
    value: disabled,
  },
  ConfigRule {
    key: "OGRE_BUILD_TOOLS",
    value: disabled,
  },
  ConfigRule {
    key: "OGRE_INSTALL_PDB",
    value: disabled,
  },
  ConfigRule {
    key: "OGRE_STATIC",
    value: static_build,
  },
  ConfigRule {
    key: "CMAKE_EXE_LINKER_FLAGS",
    value: export_symbols,
  },
  ConfigRule {
    key: "OGRE_BUILD_RENDERSYSTEM_METAL",
    value: metal,
  },
  ConfigRule {
    key: "CMAKE_CXX_STANDARD",
    value: cxx_standard,
  },
  ConfigRule {
    key: "OGRE_USE_BOOST",
    value: boost,
  },
  ConfigRule {
    key: "OGRE_BUILD_PLUGIN_CG",
    value: cg_plugin,
  },
  ConfigRule {
    key: "CMAKE_BUILD_TYPE",
    value: build_type,
  },
];

/// Translate resolved options into the build tool configuration.
pub fn translate(options: &OptionSet, platform: &PlatformDescriptor) -> BuildConfig {
  let mut config = BuildConfig::default();
  for rule in CONFIG_RULES {
    if let Some(value) = (rule.value)(options, platform) {
      config.insert(rule.key, value);
    }
  }
  config
}
