use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::{Os, PlatformError};

/// Toolchain families the recipe distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Compiler {
  #[serde(rename = "gcc")]
  Gcc,
  #[serde(rename = "clang")]
  Clang,
  #[serde(rename = "apple-clang")]
  AppleClang,
  #[serde(rename = "Visual Studio")]
  VisualStudio,
}

impl Compiler {
  /// The toolchain a host OS builds with when none is configured.
  pub fn default_for(os: Os) -> Self {
    match os {
      Os::Windows => Self::VisualStudio,
      Os::Macos | Os::Ios => Self::AppleClang,
      Os::FreeBsd | Os::Android => Self::Clang,
      Os::Linux => Self::Gcc,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Gcc => "gcc",
      Self::Clang => "clang",
      Self::AppleClang => "apple-clang",
      Self::VisualStudio => "Visual Studio",
    }
  }
}

impl fmt::Display for Compiler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Compiler {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "gcc" => Ok(Self::Gcc),
      "clang" => Ok(Self::Clang),
      "apple-clang" => Ok(Self::AppleClang),
      "visual studio" | "msvc" => Ok(Self::VisualStudio),
      _ => Err(PlatformError::Unknown {
        setting: "compiler",
        value: s.to_string(),
      }),
    }
  }
}
