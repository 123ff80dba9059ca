//! Platform descriptors.
//!
//! A [`PlatformDescriptor`] names the target a package is produced for: the
//! operating system, CPU architecture, compiler family and build type. It is
//! supplied once per invocation and never mutated.

pub mod arch;
pub mod build_type;
pub mod compiler;
pub mod os;

pub use arch::Arch;
pub use build_type::BuildType;
pub use compiler::Compiler;
pub use os::Os;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while parsing platform settings.
#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("unknown {setting} '{value}'")]
  Unknown { setting: &'static str, value: String },

  #[error("unsupported host platform: {os}/{arch}")]
  UnsupportedHost { os: &'static str, arch: &'static str },
}

/// Immutable description of the target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformDescriptor {
  pub os: Os,
  pub arch: Arch,
  pub compiler: Compiler,
  pub build_type: BuildType,
}

impl PlatformDescriptor {
  pub fn new(os: Os, arch: Arch, compiler: Compiler, build_type: BuildType) -> Self {
    Self {
      os,
      arch,
      compiler,
      build_type,
    }
  }

  /// Describe the host, using its default compiler and a Release build.
  pub fn current() -> Result<Self, PlatformError> {
    let (Some(os), Some(arch)) = (Os::current(), Arch::current()) else {
      return Err(PlatformError::UnsupportedHost {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
      });
    };
    Ok(Self::new(os, arch, Compiler::default_for(os), BuildType::Release))
  }

  pub fn is_apple(&self) -> bool {
    self.os.is_apple()
  }

  /// Short identifier, e.g. `Linux-x86_64-gcc-Release`.
  pub fn triple(&self) -> String {
    format!("{}-{}-{}-{}", self.os, self.arch, self.compiler, self.build_type)
  }
}

impl fmt::Display for PlatformDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}
