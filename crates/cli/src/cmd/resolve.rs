use anyhow::Result;
use serde::Serialize;

use ogrepkg_lib::profile::Profile;
use ogrepkg_lib::resolve::{Resolution, system_packages};

use super::resolve_profile;
use crate::output::{OutputFormat, print_info, print_item, print_json, print_stat, print_warning};

#[derive(Serialize)]
struct ResolveReport<'a> {
  #[serde(flatten)]
  resolution: &'a Resolution,
  system_packages: Vec<String>,
}

pub fn cmd_resolve(profile: &Profile, format: OutputFormat) -> Result<()> {
  let (platform, resolution) = resolve_profile(profile)?;
  let packages = system_packages(&platform);

  if format.is_json() {
    return print_json(&ResolveReport {
      resolution: &resolution,
      system_packages: packages,
    });
  }

  for applied in &resolution.overrides {
    print_warning(&format!(
      "{} forced {} -> {} ({})",
      applied.option, applied.from, applied.to, applied.reason
    ));
  }

  print_info(&format!("Options for {}", platform.triple()));
  for (name, value) in resolution.options.iter() {
    print_stat(name, &value.to_string());
  }

  println!();
  print_info(&format!("Dependencies ({})", resolution.dependencies.len()));
  for dependency in &resolution.dependencies {
    print_item(&dependency.to_string());
  }

  if !packages.is_empty() {
    println!();
    print_info("System packages");
    for package in &packages {
      print_item(package);
    }
  }
  Ok(())
}
