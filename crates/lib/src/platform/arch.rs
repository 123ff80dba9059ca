use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::PlatformError;

/// CPU architectures, named the way package settings name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
  X86,
  X86_64,
  Armv7,
  Armv7hf,
  Armv8,
  Ppc64le,
}

impl Arch {
  /// Detect the host CPU architecture at runtime
  pub fn current() -> Option<Self> {
    Self::from_host(std::env::consts::ARCH, cfg!(target_endian = "little"))
  }

  /// Map a Rust target architecture name; `powerpc64` is only `ppc64le` on little-endian hosts.
  fn from_host(arch: &str, little_endian: bool) -> Option<Self> {
    match arch {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::X86_64),
      "arm" => Some(Self::Armv7),
      "aarch64" => Some(Self::Armv8),
      "powerpc64" if little_endian => Some(Self::Ppc64le),
      _ => None,
    }
  }

  /// Returns the settings identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
      Self::Armv7 => "armv7",
      Self::Armv7hf => "armv7hf",
      Self::Armv8 => "armv8",
      Self::Ppc64le => "ppc64le",
    }
  }

  /// Whether the architecture identifier carries the `x86` marker.
  pub fn is_x86_family(&self) -> bool {
    self.as_str().contains("x86")
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "x86" | "i386" | "i686" => Ok(Self::X86),
      "x86_64" | "amd64" => Ok(Self::X86_64),
      "armv7" | "arm" => Ok(Self::Armv7),
      "armv7hf" => Ok(Self::Armv7hf),
      "armv8" | "aarch64" | "arm64" => Ok(Self::Armv8),
      "ppc64le" => Ok(Self::Ppc64le),
      _ => Err(PlatformError::Unknown {
        setting: "arch",
        value: s.to_string(),
      }),
    }
  }
}
