use ogrepkg_lib::collect::{self, artifact_rules, link_metadata};
use ogrepkg_lib::options::{OptionError, OptionSet, OptionValue};
use ogrepkg_lib::platform::{Arch, BuildType, Os};
use ogrepkg_lib::resolve::resolve;
use ogrepkg_lib::translate::{ConfigValue, DISABLED_COMPONENTS, EXPORT_ALL_SYMBOLS_FLAG, translate};
use tempfile::TempDir;

use super::common::{ALL_ARCH, ALL_BUILD_TYPES, ALL_OS, all_platforms, platform};

/// A spread of requested option sets covering every option value at least once.
fn requested_variants() -> Vec<OptionSet> {
  let assignments: &[&[(&str, &str)]] = &[
    &[],
    &[("shared", "False")],
    &[("with_cg", "False"), ("use_boost", "False")],
    &[("with_metal", "True"), ("hlms_type", "mobile")],
    &[("shared", "False"), ("with_metal", "True"), ("SDL2:x11_video", "False")],
    &[("freetype:shared", "True"), ("with_cg", "True")],
  ];
  assignments
    .iter()
    .map(|pairs| OptionSet::from_requested(pairs.iter().copied()).unwrap())
    .collect()
}

#[test]
fn non_x86_architectures_never_enable_cg() {
  for platform in all_platforms() {
    if platform.arch.is_x86_family() {
      continue;
    }
    for requested in requested_variants() {
      let resolution = resolve(&requested, &platform).unwrap();
      assert_eq!(resolution.options.get("with_cg"), Some(OptionValue::Bool(false)), "{platform}");
      assert!(!resolution.dependencies.iter().any(|d| d.name == "Cg"), "{platform}");
    }
  }
}

#[test]
fn macos_uses_alternate_sdl_channel_and_disables_x11_video() {
  for &arch in ALL_ARCH {
    for &build_type in ALL_BUILD_TYPES {
      let platform = platform(Os::Macos, arch, build_type);
      for requested in requested_variants() {
        let resolution = resolve(&requested, &platform).unwrap();
        let sdl = resolution.dependencies.iter().find(|d| d.name == "SDL2").unwrap();
        assert_eq!(sdl.channel, "hilborn/stable");
        assert!(!resolution.options.flag("SDL2:x11_video"));
      }
    }
  }

  let linux = platform(Os::Linux, Arch::X86_64, BuildType::Release);
  let resolution = resolve(&OptionSet::default(), &linux).unwrap();
  let sdl = resolution.dependencies.iter().find(|d| d.name == "SDL2").unwrap();
  assert_eq!(sdl.channel, "lasote/stable");
}

#[test]
fn resolution_is_idempotent_everywhere() {
  for platform in all_platforms() {
    for requested in requested_variants() {
      let first = resolve(&requested, &platform).unwrap();
      let second = resolve(&first.options, &platform).unwrap();
      assert_eq!(second.options, first.options, "{platform}");
      assert_eq!(second.dependencies, first.dependencies, "{platform}");
      assert!(second.overrides.is_empty(), "{platform}");
    }
  }
}

#[test]
fn translate_always_disables_extra_components() {
  for platform in all_platforms() {
    for requested in requested_variants() {
      let options = resolve(&requested, &platform).unwrap().options;
      let config = translate(&options, &platform);
      for key in DISABLED_COMPONENTS {
        assert_eq!(config.get(key), Some(&ConfigValue::Bool(false)), "{key} on {platform}");
      }
      assert_eq!(config.get("CMAKE_CXX_STANDARD"), Some(&ConfigValue::Int(11)));
    }
  }
}

#[test]
fn export_flag_only_for_static_linux() {
  let static_opts = OptionSet::from_requested([("shared", "False")]).unwrap();
  let export = ConfigValue::Str(EXPORT_ALL_SYMBOLS_FLAG.to_string());

  for &os in ALL_OS {
    let platform = platform(os, Arch::X86_64, BuildType::Release);
    let static_config = translate(&static_opts, &platform);
    let shared_config = translate(&OptionSet::default(), &platform);

    if os == Os::Linux {
      assert_eq!(static_config.get("CMAKE_EXE_LINKER_FLAGS"), Some(&export));
    } else {
      assert!(!static_config.contains("CMAKE_EXE_LINKER_FLAGS"), "{os}");
    }
    assert!(!shared_config.contains("CMAKE_EXE_LINKER_FLAGS"), "{os}");
  }
}

#[test]
fn mobile_shared_linux_release_libs() {
  let options = OptionSet::from_requested([("hlms_type", "mobile"), ("shared", "True")]).unwrap();
  let link = link_metadata(&options, &platform(Os::Linux, Arch::X86_64, BuildType::Release));
  assert_eq!(
    link.libs,
    vec!["OgreMain", "OgreOverlay", "OgreHlmsPbsMobile", "OgreHlmsUnlitMobile", "dl"]
  );
  assert!(link.exelinkflags.is_empty());
  assert!(!link.is_static);
}

#[test]
fn static_metal_debug_libs_follow_apple_asymmetry() {
  let options = OptionSet::from_requested([("shared", "False"), ("with_metal", "True")]).unwrap();

  let windows = link_metadata(&options, &platform(Os::Windows, Arch::X86_64, BuildType::Debug));
  assert_eq!(
    windows.libs,
    vec![
      "OgreMainStatic_d",
      "OgreOverlayStatic_d",
      "OgreHlmsPbsStatic_d",
      "OgreHlmsUnlitStatic_d",
      "Plugin_ParticleFXStatic_d",
      "RenderSystem_GL3PlusStatic_d",
      "RenderSystem_NULLStatic_d",
      "RenderSystem_MetalStatic_d",
    ]
  );

  let linux = link_metadata(&options, &platform(Os::Linux, Arch::X86_64, BuildType::Debug));
  assert_eq!(&linux.libs[..windows.libs.len()], windows.libs.as_slice());
  assert_eq!(linux.libs.last().unwrap(), "dl");

  let macos = link_metadata(&options, &platform(Os::Macos, Arch::X86_64, BuildType::Debug));
  assert_eq!(
    macos.libs,
    windows.libs.iter().map(|l| l.trim_end_matches("_d").to_string()).collect::<Vec<_>>()
  );
  assert!(macos.is_static);
}

#[test]
fn missing_artifact_sources_are_not_fatal() {
  let temp = TempDir::new().unwrap();
  let platform = platform(Os::Macos, Arch::X86_64, BuildType::Release);
  let options = resolve(&OptionSet::default(), &platform).unwrap().options;

  let manifest = collect::collect(
    &temp.path().join("no-such-build"),
    &temp.path().join("package"),
    &artifact_rules(&platform, true),
    &options,
    &platform,
  )
  .unwrap();

  assert!(manifest.files.is_empty());
  assert_eq!(manifest.warnings.len(), artifact_rules(&platform, true).len());
  assert!(!manifest.link.libs.is_empty());
  assert_eq!(manifest.link.exelinkflags, vec!["-framework Foundation"]);
}

#[test]
fn out_of_domain_values_are_configuration_errors() {
  assert!(matches!(
    OptionSet::from_requested([("hlms_type", "tablet")]),
    Err(OptionError::InvalidValue { .. })
  ));
  assert!(matches!(
    OptionSet::from_requested([("with_vulkan", "True")]),
    Err(OptionError::Unknown { .. })
  ));
}
