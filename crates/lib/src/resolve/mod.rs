//! Option and dependency resolution.
//!
//! Resolution applies the platform-forced [`overrides::OVERRIDE_RULES`] to the
//! requested options and then computes the dependency list from the result. It is
//! a pure function of its inputs and idempotent: resolving resolved options
//! changes nothing.

pub mod dependencies;
pub mod overrides;

use serde::Serialize;
use tracing::{debug, warn};

pub use dependencies::{DependencySpec, dependencies, system_packages};
pub use overrides::{AppliedOverride, OVERRIDE_RULES, OverrideRule};

use crate::options::{OptionError, OptionSet};
use crate::platform::PlatformDescriptor;

/// Resolved options together with the dependencies they imply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
  pub options: OptionSet,
  pub dependencies: Vec<DependencySpec>,
  /// Overrides that changed a requested value, in the order they fired.
  pub overrides: Vec<AppliedOverride>,
}

/// Resolve requested options against a platform.
///
/// No partial result is returned: if an override produces a value outside its
/// option's domain the whole resolution fails before dependencies are computed.
pub fn resolve(requested: &OptionSet, platform: &PlatformDescriptor) -> Result<Resolution, OptionError> {
  let (options, overrides) = apply_overrides(requested, platform, OVERRIDE_RULES)?;
  let dependencies = dependencies(&options, platform);
  debug!(platform = %platform, count = dependencies.len(), "resolved dependencies");

  Ok(Resolution {
    options,
    dependencies,
    overrides,
  })
}

/// Apply an ordered override table to an option set.
pub fn apply_overrides(
  requested: &OptionSet,
  platform: &PlatformDescriptor,
  rules: &[OverrideRule],
) -> Result<(OptionSet, Vec<AppliedOverride>), OptionError> {
  let mut options = requested.clone();
  let mut applied = Vec::new();

  for rule in rules.iter().filter(|rule| (rule.applies)(platform)) {
    let current = options.get(rule.option);
    if current == Some(rule.value) {
      continue;
    }
    options.set(rule.option, rule.value)?;
    if let Some(from) = current {
      warn!(option = rule.option, from = %from, to = %rule.value, reason = rule.reason, "option forced by platform");
      applied.push(AppliedOverride {
        option: rule.option,
        from,
        to: rule.value,
        reason: rule.reason,
      });
    }
  }

  Ok((options, applied))
}
