use anyhow::{Context, Result};
use serde::Serialize;

use ogrepkg_lib::platform::PlatformDescriptor;
use ogrepkg_lib::profile::Profile;
use ogrepkg_lib::recipe::Recipe;

use crate::output::{OutputFormat, print_info, print_json, print_stat};

#[derive(Serialize)]
struct InfoReport<'a> {
  recipe: &'a Recipe,
  target: PlatformDescriptor,
  host: Option<PlatformDescriptor>,
}

pub fn cmd_info(profile: &Profile, format: OutputFormat) -> Result<()> {
  let recipe = profile.recipe();
  let target = profile.platform().context("Invalid platform settings")?;
  let host = PlatformDescriptor::current().ok();

  if format.is_json() {
    return print_json(&InfoReport {
      recipe: &recipe,
      target,
      host,
    });
  }

  print_info(&format!("{} - {}", recipe.reference(), recipe.description));
  print_stat("Homepage", &recipe.homepage);
  print_stat("License", &recipe.license);
  print_stat("Source", &recipe.source_url);
  print_stat("Folder", &recipe.source_folder);
  println!();
  print_stat("Target", &target.triple());
  match host {
    Some(host) => print_stat("Host", &host.triple()),
    None => print_stat("Host", "unsupported"),
  }
  Ok(())
}
