mod build;
mod configure;
mod info;
mod metadata;
mod package;
mod resolve;

pub use build::{BuildArgs, cmd_build};
pub use configure::cmd_configure;
pub use info::cmd_info;
pub use metadata::cmd_metadata;
pub use package::{PackageArgs, cmd_package};
pub use resolve::cmd_resolve;

use anyhow::{Context, Result};
use tracing::debug;

use ogrepkg_lib::options::OptionSet;
use ogrepkg_lib::platform::PlatformDescriptor;
use ogrepkg_lib::profile::Profile;
use ogrepkg_lib::resolve::{Resolution, resolve};

use crate::ProfileArgs;

/// Load the profile file, if any, and layer command-line assignments on top.
pub fn load_profile(args: &ProfileArgs) -> Result<Profile> {
  let mut profile = match &args.profile {
    Some(path) => Profile::load(path)?,
    None => Profile::default(),
  };
  for setting in &args.settings {
    profile
      .set_setting(setting)
      .with_context(|| format!("Invalid setting: {}", setting))?;
  }
  for option in &args.options {
    profile
      .set_option(option)
      .with_context(|| format!("Invalid option: {}", option))?;
  }
  debug!(settings = args.settings.len(), options = args.options.len(), "profile loaded");
  Ok(profile)
}

/// Target platform and resolved options for a profile.
pub fn resolve_profile(profile: &Profile) -> Result<(PlatformDescriptor, Resolution)> {
  let platform = profile.platform().context("Invalid platform settings")?;
  let requested: OptionSet = profile.requested_options().context("Invalid options")?;
  let resolution = resolve(&requested, &platform).context("Option resolution failed")?;
  Ok((platform, resolution))
}
