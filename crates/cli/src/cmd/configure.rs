use anyhow::Result;

use ogrepkg_lib::profile::Profile;
use ogrepkg_lib::translate::translate;

use super::resolve_profile;
use crate::output::{OutputFormat, print_json};

/// Print the build configuration, one `-DKEY=VALUE` define per line.
pub fn cmd_configure(profile: &Profile, format: OutputFormat) -> Result<()> {
  let (platform, resolution) = resolve_profile(profile)?;
  let config = translate(&resolution.options, &platform);

  if format.is_json() {
    return print_json(&config);
  }
  for define in config.to_defines() {
    println!("{}", define);
  }
  Ok(())
}
