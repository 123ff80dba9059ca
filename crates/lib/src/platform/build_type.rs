use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::PlatformError;

/// Native build configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum BuildType {
  Debug,
  #[default]
  Release,
  RelWithDebInfo,
  MinSizeRel,
}

impl BuildType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
      Self::RelWithDebInfo => "RelWithDebInfo",
      Self::MinSizeRel => "MinSizeRel",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildType {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "debug" => Ok(Self::Debug),
      "release" => Ok(Self::Release),
      "relwithdebinfo" => Ok(Self::RelWithDebInfo),
      "minsizerel" => Ok(Self::MinSizeRel),
      _ => Err(PlatformError::Unknown {
        setting: "build_type",
        value: s.to_string(),
      }),
    }
  }
}
