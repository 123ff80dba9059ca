//! The dependency table.
//!
//! Membership and source channel of each requirement are computed from the
//! resolved options and the platform; nothing here is static beyond the table.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::options::OptionSet;
use crate::platform::{Arch, Compiler, Os, PlatformDescriptor};

/// A concrete requirement handed to the dependency fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpec {
  pub name: String,
  pub version: String,
  /// `user/channel` selecting which maintained fork to fetch.
  pub channel: String,
  /// Private requirements do not propagate to consumers of the package.
  pub private: bool,
  pub options: BTreeMap<String, String>,
}

impl DependencySpec {
  /// The `name/version@user/channel` reference string.
  pub fn reference(&self) -> String {
    format!("{}/{}@{}", self.name, self.version, self.channel)
  }
}

impl fmt::Display for DependencySpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.reference())?;
    if self.private {
      write!(f, " (private)")?;
    }
    for (key, value) in &self.options {
      write!(f, " {}:{}={}", self.name, key, value)?;
    }
    Ok(())
  }
}

struct Requirement {
  name: &'static str,
  version: &'static str,
  channel: fn(&PlatformDescriptor) -> &'static str,
  private: bool,
  when: fn(&OptionSet, &PlatformDescriptor) -> bool,
  extra_options: fn(&PlatformDescriptor) -> &'static [(&'static str, &'static str)],
}

fn always(_: &OptionSet, _: &PlatformDescriptor) -> bool {
  true
}

fn hilborn(_: &PlatformDescriptor) -> &'static str {
  "hilborn/stable"
}

fn lasote(_: &PlatformDescriptor) -> &'static str {
  "lasote/stable"
}

fn inexorgame(_: &PlatformDescriptor) -> &'static str {
  "inexorgame/stable"
}

fn sdl2_channel(platform: &PlatformDescriptor) -> &'static str {
  if platform.os == Os::Macos {
    "hilborn/stable"
  } else {
    "lasote/stable"
  }
}

fn wants_cg(options: &OptionSet, platform: &PlatformDescriptor) -> bool {
  options.with_cg() && platform.os != Os::Macos
}

fn wants_boost(options: &OptionSet, _: &PlatformDescriptor) -> bool {
  options.use_boost()
}

fn no_extra_options(_: &PlatformDescriptor) -> &'static [(&'static str, &'static str)] {
  &[]
}

fn boost_options(platform: &PlatformDescriptor) -> &'static [(&'static str, &'static str)] {
  if platform.compiler == Compiler::VisualStudio {
    &[]
  } else {
    &[("fPIC", "True")]
  }
}

const REQUIREMENTS: &[Requirement] = &[
  Requirement {
    name: "freeimage",
    version: "3.17.0",
    channel: hilborn,
    private: false,
    when: always,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "freetype",
    version: "2.6.3",
    channel: hilborn,
    private: false,
    when: always,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "zlib",
    version: "1.2.8",
    channel: lasote,
    private: false,
    when: always,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "zziplib",
    version: "0.13.62",
    channel: hilborn,
    private: false,
    when: always,
    extra_options: no_extra_options,
  },
  // Pulled in for freetype's Overlay link line only
  Requirement {
    name: "libpng",
    version: "1.6.23",
    channel: lasote,
    private: true,
    when: always,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "bzip2",
    version: "1.0.6",
    channel: lasote,
    private: true,
    when: always,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "RapidJSON",
    version: "1.0.2",
    channel: inexorgame,
    private: false,
    when: always,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "SDL2",
    version: "2.0.5",
    channel: sdl2_channel,
    private: false,
    when: always,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "OIS",
    version: "1.3",
    channel: hilborn,
    private: false,
    when: always,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "Cg",
    version: "3.1",
    channel: hilborn,
    private: false,
    when: wants_cg,
    extra_options: no_extra_options,
  },
  Requirement {
    name: "Boost",
    version: "1.60.0",
    channel: lasote,
    private: false,
    when: wants_boost,
    extra_options: boost_options,
  },
];

/// Compute the ordered dependency list for resolved options.
pub fn dependencies(options: &OptionSet, platform: &PlatformDescriptor) -> Vec<DependencySpec> {
  REQUIREMENTS
    .iter()
    .filter(|req| (req.when)(options, platform))
    .map(|req| {
      let mut sub_options = options.scoped(req.name);
      for (key, value) in (req.extra_options)(platform) {
        sub_options.insert(key.to_string(), value.to_string());
      }
      DependencySpec {
        name: req.name.to_string(),
        version: req.version.to_string(),
        channel: (req.channel)(platform).to_string(),
        private: req.private,
        options: sub_options,
      }
    })
    .collect()
}

/// Development packages the native build needs from the host package manager.
///
/// Only Linux x86 hosts have a known package set; everything else gets none.
pub fn system_packages(platform: &PlatformDescriptor) -> Vec<String> {
  const X11_DEV: &[&str] = &["libxmu-dev", "libxaw7-dev", "libxt-dev", "libxrandr-dev"];

  if platform.os != Os::Linux {
    return Vec::new();
  }
  let suffix = match platform.arch {
    Arch::X86 => "i386",
    Arch::X86_64 => "amd64",
    _ => return Vec::new(),
  };
  X11_DEV.iter().map(|pkg| format!("{}:{}", pkg, suffix)).collect()
}
