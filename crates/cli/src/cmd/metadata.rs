use anyhow::Result;

use ogrepkg_lib::collect::link_metadata;
use ogrepkg_lib::profile::Profile;

use super::resolve_profile;
use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_metadata(profile: &Profile, format: OutputFormat) -> Result<()> {
  let (platform, resolution) = resolve_profile(profile)?;
  let link = link_metadata(&resolution.options, &platform);

  if format.is_json() {
    return print_json(&link);
  }

  print_info(&format!("Link metadata for {}", platform.triple()));
  print_stat("libs", &link.libs.join(" "));
  print_stat("exelinkflags", &link.exelinkflags.join(" "));
  print_stat("sharedlinkflags", &link.sharedlinkflags.join(" "));
  print_stat("static", if link.is_static { "True" } else { "False" });
  Ok(())
}
