//! Shared fixtures: fake collaborators and platform helpers.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use ogrepkg_lib::external::{BuildInvocation, BuildTool, ExternalError, Patcher, SourceFetcher, SystemPackager};
use ogrepkg_lib::platform::{Arch, BuildType, Compiler, Os, PlatformDescriptor};
use ogrepkg_lib::recipe::Recipe;
use ogrepkg_lib::translate::BuildConfig;

pub const ALL_OS: &[Os] = &[Os::Linux, Os::Windows, Os::Macos, Os::Ios, Os::Android, Os::FreeBsd];
pub const ALL_ARCH: &[Arch] = &[Arch::X86, Arch::X86_64, Arch::Armv7, Arch::Armv7hf, Arch::Armv8, Arch::Ppc64le];
pub const ALL_BUILD_TYPES: &[BuildType] = &[
  BuildType::Debug,
  BuildType::Release,
  BuildType::RelWithDebInfo,
  BuildType::MinSizeRel,
];

pub fn platform(os: Os, arch: Arch, build_type: BuildType) -> PlatformDescriptor {
  PlatformDescriptor::new(os, arch, Compiler::default_for(os), build_type)
}

/// Every os/arch/build type combination.
pub fn all_platforms() -> Vec<PlatformDescriptor> {
  let mut platforms = Vec::new();
  for &os in ALL_OS {
    for &arch in ALL_ARCH {
      for &build_type in ALL_BUILD_TYPES {
        platforms.push(platform(os, arch, build_type));
      }
    }
  }
  platforms
}

pub fn write_file(root: &Path, rel: &str, content: &str) {
  let path = root.join(rel);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

/// Ordered record of collaborator calls.
#[derive(Default)]
pub struct CallLog(RefCell<Vec<&'static str>>);

impl CallLog {
  pub fn push(&self, call: &'static str) {
    self.0.borrow_mut().push(call);
  }

  pub fn calls(&self) -> Vec<&'static str> {
    self.0.borrow().clone()
  }
}

pub const OVERLAY_CMAKE: &str = "Components/Overlay/CMakeLists.txt";

/// Writes a minimal source tree containing the file the default recipe edits.
pub struct FakeFetcher<'a> {
  pub log: &'a CallLog,
  pub fail: bool,
}

impl SourceFetcher for FakeFetcher<'_> {
  fn fetch(&self, recipe: &Recipe, work_dir: &Path) -> Result<PathBuf, ExternalError> {
    self.log.push("fetch");
    if self.fail {
      return Err(ExternalError::FetchFailed {
        url: recipe.source_url.clone(),
        message: "HTTP 404 Not Found".to_string(),
      });
    }
    let source = work_dir.join(&recipe.source_folder);
    write_file(
      &source,
      OVERLAY_CMAKE,
      "target_link_libraries(OgreOverlay OgreMain ${FREETYPE_LIBRARIES})\n",
    );
    Ok(source)
  }
}

pub struct RecordingPatcher<'a, P> {
  pub log: &'a CallLog,
  pub inner: P,
}

impl<P: Patcher> Patcher for RecordingPatcher<'_, P> {
  fn apply(&self, recipe: &Recipe, source_dir: &Path) -> Result<(), ExternalError> {
    self.log.push("patch");
    self.inner.apply(recipe, source_dir)
  }
}

/// Installs a fixed list of files, or fails like a broken compile.
pub struct FakeBuildTool<'a> {
  pub log: &'a CallLog,
  pub installs: Vec<String>,
  pub stderr: Option<String>,
  pub seen: RefCell<Option<(BuildConfig, String)>>,
}

impl<'a> FakeBuildTool<'a> {
  pub fn installing(log: &'a CallLog, installs: &[&str]) -> Self {
    Self {
      log,
      installs: installs.iter().map(|s| s.to_string()).collect(),
      stderr: None,
      seen: RefCell::new(None),
    }
  }

  pub fn failing(log: &'a CallLog, stderr: &str) -> Self {
    Self {
      stderr: Some(stderr.to_string()),
      ..Self::installing(log, &[])
    }
  }
}

impl BuildTool for FakeBuildTool<'_> {
  fn build(&self, invocation: &BuildInvocation<'_>) -> Result<(), ExternalError> {
    self.log.push("build");
    *self.seen.borrow_mut() = Some((invocation.config.clone(), invocation.target.to_string()));
    if let Some(stderr) = &self.stderr {
      return Err(ExternalError::CmdFailed {
        cmd: "cmake --build".to_string(),
        code: Some(2),
        stderr: stderr.clone(),
      });
    }
    for file in &self.installs {
      write_file(invocation.install_dir, file, "");
    }
    Ok(())
  }
}

pub struct FakePackager<'a> {
  pub log: &'a CallLog,
  pub installed: RefCell<Vec<String>>,
  pub fail: bool,
}

impl SystemPackager for FakePackager<'_> {
  fn install(&self, packages: &[String]) -> Result<(), ExternalError> {
    self.log.push("system");
    self.installed.borrow_mut().extend(packages.iter().cloned());
    if self.fail {
      return Err(ExternalError::CmdFailed {
        cmd: "apt-get install -y".to_string(),
        code: Some(100),
        stderr: "E: Unable to locate package".to_string(),
      });
    }
    Ok(())
  }
}
