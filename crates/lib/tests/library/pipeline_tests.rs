use std::cell::RefCell;
use std::fs;

use ogrepkg_lib::collect::{CollectError, ConsistencyPolicy, MetadataInconsistency};
use ogrepkg_lib::external::DirPatcher;
use ogrepkg_lib::options::OptionSet;
use ogrepkg_lib::pipeline::{MANIFEST_FILE, PackageRequest, Pipeline, PipelineError};
use ogrepkg_lib::platform::{Arch, BuildType, Os, PlatformDescriptor};
use ogrepkg_lib::recipe::Recipe;
use ogrepkg_lib::translate::ConfigValue;
use tempfile::TempDir;

use super::common::{CallLog, FakeBuildTool, FakeFetcher, FakePackager, OVERLAY_CMAKE, RecordingPatcher, platform};

const LINUX_SHARED_INSTALL: &[&str] = &[
  "include/OGRE/OgreRoot.h",
  "include/OGRE/Math/Array/OgreArrayVector3.inl",
  "lib/libOgreMain.so",
  "lib/libOgreOverlay.so",
  "lib/libOgreHlmsPbs.so",
  "lib/libOgreHlmsUnlit.so",
  "lib/OGRE/cmake/OGREConfig.cmake",
  "share/OGRE/plugins.cfg",
];

fn request(temp: &TempDir, platform: PlatformDescriptor, requested: OptionSet) -> PackageRequest {
  PackageRequest {
    recipe: Recipe::default(),
    platform,
    requested,
    work_dir: temp.path().join("work"),
    package_dir: temp.path().join("package"),
  }
}

fn linux() -> PlatformDescriptor {
  platform(Os::Linux, Arch::X86_64, BuildType::Release)
}

#[test]
fn linux_shared_run_produces_consistent_package() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = RecordingPatcher {
    log: &log,
    inner: DirPatcher::new(),
  };
  let build = FakeBuildTool::installing(&log, LINUX_SHARED_INSTALL);

  let request = request(&temp, linux(), OptionSet::default());
  let outcome = Pipeline::new(&fetcher, &patcher, &build)
    .with_policy(ConsistencyPolicy::Deny)
    .run(&request)
    .unwrap();

  assert_eq!(log.calls(), vec!["fetch", "patch", "build"]);

  let package = &request.package_dir;
  assert!(package.join("include/OGRE/OgreRoot.h").is_file());
  assert!(package.join("include/OGRE/Math/Array/OgreArrayVector3.inl").is_file());
  assert!(package.join("lib/libOgreMain.so").is_file());
  assert!(!package.join("lib/OGRE").exists());
  assert!(!package.join("share").exists());

  assert_eq!(outcome.manifest_path, package.join(MANIFEST_FILE));
  assert!(outcome.manifest_path.is_file());
  assert!(outcome.manifest.inconsistencies().is_empty());
  assert_eq!(
    outcome.manifest.link.libs,
    vec!["OgreMain", "OgreOverlay", "OgreHlmsPbs", "OgreHlmsUnlit", "dl"]
  );
  assert!(!outcome.manifest.link.is_static);
}

#[test]
fn build_receives_translated_config_and_install_target() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let build = FakeBuildTool::installing(&log, &[]);

  let requested = OptionSet::from_requested([("shared", "False")]).unwrap();
  let outcome = Pipeline::new(&fetcher, &patcher, &build)
    .run(&request(&temp, linux(), requested))
    .unwrap();

  let (config, target) = build.seen.borrow().clone().unwrap();
  assert_eq!(target, "install");
  assert_eq!(config, outcome.config);
  assert_eq!(config.get("OGRE_STATIC"), Some(&ConfigValue::Bool(true)));
  assert!(config.contains("CMAKE_EXE_LINKER_FLAGS"));
}

#[test]
fn source_edits_are_applied_after_fetch() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let build = FakeBuildTool::installing(&log, &[]);

  let request = request(&temp, linux(), OptionSet::default());
  Pipeline::new(&fetcher, &patcher, &build).run(&request).unwrap();

  let edited = fs::read_to_string(request.work_dir.join("ogre-v2.1").join(OVERLAY_CMAKE)).unwrap();
  assert!(edited.contains("${CONAN_LIBS_BZIP2} ${CONAN_LIBS_LIBPNG} ${CONAN_LIBS_ZLIB}"));
}

#[test]
fn build_failure_is_propagated_verbatim_and_nothing_is_packaged() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let stderr = "OgreMain/src/OgreRoot.cpp:42: error: 'Foo' was not declared in this scope\n";
  let build = FakeBuildTool::failing(&log, stderr);

  let request = request(&temp, linux(), OptionSet::default());
  let err = Pipeline::new(&fetcher, &patcher, &build).run(&request).unwrap_err();

  assert!(matches!(err, PipelineError::Build(_)));
  assert!(err.to_string().contains(stderr));
  assert!(!request.package_dir.exists());
}

#[test]
fn fetch_failure_halts_before_patch_and_build() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: true };
  let patcher = RecordingPatcher {
    log: &log,
    inner: DirPatcher::new(),
  };
  let build = FakeBuildTool::installing(&log, LINUX_SHARED_INSTALL);

  let err = Pipeline::new(&fetcher, &patcher, &build)
    .run(&request(&temp, linux(), OptionSet::default()))
    .unwrap_err();

  assert!(matches!(err, PipelineError::Fetch(_)));
  assert!(err.to_string().contains("HTTP 404 Not Found"));
  assert_eq!(log.calls(), vec!["fetch"]);
}

#[test]
fn edit_without_match_is_a_patch_error() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let build = FakeBuildTool::installing(&log, &[]);

  let mut request = request(&temp, linux(), OptionSet::default());
  request.recipe.source_edits[0].search = "target_link_libraries(OgreOverlay OgreMain)".to_string();

  let err = Pipeline::new(&fetcher, &patcher, &build).run(&request).unwrap_err();
  assert!(matches!(err, PipelineError::Patch(_)));
  assert_eq!(log.calls(), vec!["fetch"]);
}

#[test]
fn system_package_failure_is_not_fatal() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let build = FakeBuildTool::installing(&log, &[]);
  let packager = FakePackager {
    log: &log,
    installed: RefCell::new(Vec::new()),
    fail: true,
  };

  Pipeline::new(&fetcher, &patcher, &build)
    .with_system_packager(&packager)
    .run(&request(&temp, linux(), OptionSet::default()))
    .unwrap();

  assert_eq!(log.calls(), vec!["system", "fetch", "build"]);
  assert!(packager.installed.borrow().contains(&"libxrandr-dev:amd64".to_string()));
}

#[test]
fn missing_libraries_fail_under_deny_policy() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let build = FakeBuildTool::installing(&log, &["lib/libOgreMain.so", "lib/libOgreTerrain.so"]);

  let request = request(&temp, linux(), OptionSet::default());
  let err = Pipeline::new(&fetcher, &patcher, &build)
    .with_policy(ConsistencyPolicy::Deny)
    .run(&request)
    .unwrap_err();

  let findings = match err {
    PipelineError::Collect(CollectError::Inconsistent(findings)) => findings,
    other => panic!("expected inconsistency, got {other}"),
  };
  assert!(findings.contains(&MetadataInconsistency::MissingLibrary {
    name: "OgreHlmsPbs".to_string()
  }));
  assert!(findings.contains(&MetadataInconsistency::UnlistedLibrary {
    file: "lib/libOgreTerrain.so".to_string()
  }));
  assert!(!findings.iter().any(|f| matches!(f, MetadataInconsistency::MissingLibrary { name } if name == "dl")));
}

#[test]
fn missing_libraries_only_warn_by_default() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let build = FakeBuildTool::installing(&log, &[]);

  let outcome = Pipeline::new(&fetcher, &patcher, &build)
    .run(&request(&temp, linux(), OptionSet::default()))
    .unwrap();

  assert!(outcome.manifest.files.is_empty());
  assert_eq!(outcome.manifest.inconsistencies().len(), 4);
  assert!(outcome.manifest_path.is_file());
}

#[test]
fn macos_static_debug_packages_frameworks_without_debug_suffix() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let build = FakeBuildTool::installing(
    &log,
    &[
      "include/OGRE/OgreRoot.h",
      "lib/macosx/Debug/OgreMainStatic.framework/Headers/OgreRoot.h",
      "lib/macosx/Debug/OgreMainStatic.framework/OgreMainStatic",
    ],
  );

  let requested = OptionSet::from_requested([("shared", "False")]).unwrap();
  let request = request(&temp, platform(Os::Macos, Arch::X86_64, BuildType::Debug), requested);
  let outcome = Pipeline::new(&fetcher, &patcher, &build).run(&request).unwrap();

  assert!(
    request
      .package_dir
      .join("Frameworks/Debug/OgreMainStatic.framework/OgreMainStatic")
      .is_file()
  );
  let link = &outcome.manifest.link;
  assert_eq!(link.libs[0], "OgreMainStatic");
  assert!(link.libs.iter().all(|l| !l.ends_with("_d")));
  assert_eq!(link.exelinkflags, vec!["-framework Foundation"]);
  assert_eq!(link.sharedlinkflags, link.exelinkflags);
  assert!(link.is_static);
  assert!(!outcome.manifest.inconsistencies().contains(&MetadataInconsistency::MissingLibrary {
    name: "OgreMainStatic".to_string()
  }));
  assert!(!outcome.config.contains("CMAKE_EXE_LINKER_FLAGS"));
}

#[test]
fn manifest_json_exposes_consumer_metadata() {
  let temp = TempDir::new().unwrap();
  let log = CallLog::default();
  let fetcher = FakeFetcher { log: &log, fail: false };
  let patcher = DirPatcher::new();
  let build = FakeBuildTool::installing(&log, LINUX_SHARED_INSTALL);

  let requested = OptionSet::from_requested([("hlms_type", "mobile")]).unwrap();
  let outcome = Pipeline::new(&fetcher, &patcher, &build)
    .run(&request(&temp, linux(), requested))
    .unwrap();

  let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&outcome.manifest_path).unwrap()).unwrap();
  assert_eq!(json["platform"]["os"], "Linux");
  assert_eq!(json["options"]["hlms_type"], "mobile");
  assert_eq!(json["link"]["static"], false);
  assert_eq!(json["link"]["libs"][2], "OgreHlmsPbsMobile");
  assert!(json["files"].as_array().unwrap().len() >= 4);
}
