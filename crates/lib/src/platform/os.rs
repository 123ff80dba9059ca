use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::PlatformError;

/// Target operating systems a package can be produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Os {
  Linux,
  Windows,
  Macos,
  #[serde(rename = "iOS")]
  Ios,
  Android,
  #[serde(rename = "FreeBSD")]
  FreeBsd,
}

impl Os {
  /// Detect the host operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "windows" => Some(Self::Windows),
      "macos" => Some(Self::Macos),
      "ios" => Some(Self::Ios),
      "android" => Some(Self::Android),
      "freebsd" => Some(Self::FreeBsd),
      _ => None,
    }
  }

  /// Returns the settings identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "Linux",
      Self::Windows => "Windows",
      Self::Macos => "Macos",
      Self::Ios => "iOS",
      Self::Android => "Android",
      Self::FreeBsd => "FreeBSD",
    }
  }

  /// Apple platforms share framework linking and unsuffixed debug libraries.
  pub fn is_apple(&self) -> bool {
    matches!(self, Self::Macos | Self::Ios)
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "linux" => Ok(Self::Linux),
      "windows" => Ok(Self::Windows),
      "macos" | "darwin" => Ok(Self::Macos),
      "ios" => Ok(Self::Ios),
      "android" => Ok(Self::Android),
      "freebsd" => Ok(Self::FreeBsd),
      _ => Err(PlatformError::Unknown {
        setting: "os",
        value: s.to_string(),
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_case_insensitively() {
    assert_eq!("linux".parse::<Os>().unwrap(), Os::Linux);
    assert_eq!("Macos".parse::<Os>().unwrap(), Os::Macos);
    assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
    assert_eq!("IOS".parse::<Os>().unwrap(), Os::Ios);
  }

  #[test]
  fn rejects_unknown_os() {
    let err = "plan9".parse::<Os>().unwrap_err();
    assert!(err.to_string().contains("plan9"));
  }

  #[test]
  fn only_macos_and_ios_are_apple() {
    assert!(Os::Macos.is_apple());
    assert!(Os::Ios.is_apple());
    assert!(!Os::Linux.is_apple());
    assert!(!Os::Windows.is_apple());
  }
}
