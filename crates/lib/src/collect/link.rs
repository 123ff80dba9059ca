//! Consumer link metadata.
//!
//! Library names are derived from options and platform alone, never from the
//! files a build happened to produce, so metadata is available even when
//! collection finds nothing. [`LINK_STEPS`] runs in order; suffixing steps see
//! the names appended by earlier steps.

use serde::Serialize;
use tracing::debug;

use crate::options::{HlmsVariant, OptionSet};
use crate::platform::{BuildType, Os, PlatformDescriptor};

pub const DESKTOP_LIBS: &[&str] = &["OgreMain", "OgreOverlay", "OgreHlmsPbs", "OgreHlmsUnlit"];
pub const MOBILE_LIBS: &[&str] = &["OgreMain", "OgreOverlay", "OgreHlmsPbsMobile", "OgreHlmsUnlitMobile"];

pub const STATIC_SUFFIX: &str = "Static";
pub const DEBUG_SUFFIX: &str = "_d";

/// Plugins and render systems linked explicitly into static consumers.
pub const STATIC_PLUGINS: &[&str] = &[
  "Plugin_ParticleFXStatic",
  "RenderSystem_GL3PlusStatic",
  "RenderSystem_NULLStatic",
];
pub const METAL_STATIC_LIB: &str = "RenderSystem_MetalStatic";

/// System libraries appended for the platform runtime.
pub const LINUX_RUNTIME_LIB: &str = "dl";
pub const SYSTEM_LIBS: &[&str] = &[LINUX_RUNTIME_LIB];

pub const APPLE_FRAMEWORK_FLAG: &str = "-framework Foundation";

/// What downstream consumers need to link against the package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkMetadata {
  pub libs: Vec<String>,
  pub exelinkflags: Vec<String>,
  pub sharedlinkflags: Vec<String>,
  #[serde(rename = "static")]
  pub is_static: bool,
}

/// One ordered step of the link metadata computation.
#[derive(Debug, Clone, Copy)]
pub struct LinkStep {
  pub name: &'static str,
  pub applies: fn(&OptionSet, &PlatformDescriptor) -> bool,
  pub apply: fn(&mut LinkMetadata, &OptionSet, &PlatformDescriptor),
}

fn always(_: &OptionSet, _: &PlatformDescriptor) -> bool {
  true
}

fn is_static(options: &OptionSet, _: &PlatformDescriptor) -> bool {
  !options.shared()
}

fn non_apple_debug(_: &OptionSet, platform: &PlatformDescriptor) -> bool {
  platform.build_type == BuildType::Debug && !platform.is_apple()
}

fn is_linux(_: &OptionSet, platform: &PlatformDescriptor) -> bool {
  platform.os == Os::Linux
}

fn is_apple(_: &OptionSet, platform: &PlatformDescriptor) -> bool {
  platform.is_apple()
}

fn base_names(link: &mut LinkMetadata, options: &OptionSet, _: &PlatformDescriptor) {
  let names = match options.hlms() {
    HlmsVariant::Desktop => DESKTOP_LIBS,
    HlmsVariant::Mobile => MOBILE_LIBS,
  };
  link.libs = names.iter().map(|name| name.to_string()).collect();
}

fn static_names(link: &mut LinkMetadata, options: &OptionSet, _: &PlatformDescriptor) {
  for lib in &mut link.libs {
    lib.push_str(STATIC_SUFFIX);
  }
  link.libs.extend(STATIC_PLUGINS.iter().map(|name| name.to_string()));
  if options.with_metal() {
    link.libs.push(METAL_STATIC_LIB.to_string());
  }
  link.is_static = true;
}

fn debug_names(link: &mut LinkMetadata, _: &OptionSet, _: &PlatformDescriptor) {
  for lib in &mut link.libs {
    lib.push_str(DEBUG_SUFFIX);
  }
}

fn linux_runtime(link: &mut LinkMetadata, _: &OptionSet, _: &PlatformDescriptor) {
  link.libs.push(LINUX_RUNTIME_LIB.to_string());
}

fn apple_frameworks(link: &mut LinkMetadata, _: &OptionSet, _: &PlatformDescriptor) {
  let flags = vec![APPLE_FRAMEWORK_FLAG.to_string()];
  link.exelinkflags.extend(flags.iter().cloned());
  link.sharedlinkflags.extend(flags);
}

pub const LINK_STEPS: &[LinkStep] = &[
  LinkStep {
    name: "base",
    applies: always,
    apply: base_names,
  },
  LinkStep {
    name: "static",
    applies: is_static,
    apply: static_names,
  },
  LinkStep {
    name: "debug",
    applies: non_apple_debug,
    apply: debug_names,
  },
  LinkStep {
    name: "linux-runtime",
    applies: is_linux,
    apply: linux_runtime,
  },
  LinkStep {
    name: "apple-frameworks",
    applies: is_apple,
    apply: apple_frameworks,
  },
];

/// Compute the consumer link metadata.
pub fn link_metadata(options: &OptionSet, platform: &PlatformDescriptor) -> LinkMetadata {
  let mut link = LinkMetadata::default();
  for step in LINK_STEPS.iter().filter(|step| (step.applies)(options, platform)) {
    debug!(step = step.name, "applying link step");
    (step.apply)(&mut link, options, platform);
  }
  link
}
