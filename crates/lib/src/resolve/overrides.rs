//! Platform-forced option overrides.
//!
//! Rules are evaluated in table order; a later rule touching the same option wins.

use serde::Serialize;

use crate::options::OptionValue;
use crate::options::schema::{SDL2_X11_VIDEO, WITH_CG};
use crate::platform::{Os, PlatformDescriptor};

/// Forces `option` to `value` whenever `applies` holds for the platform.
#[derive(Debug, Clone, Copy)]
pub struct OverrideRule {
  pub reason: &'static str,
  pub applies: fn(&PlatformDescriptor) -> bool,
  pub option: &'static str,
  pub value: OptionValue,
}

/// A rule that fired and changed a requested value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOverride {
  pub option: &'static str,
  pub from: OptionValue,
  pub to: OptionValue,
  pub reason: &'static str,
}

fn lacks_x86_marker(platform: &PlatformDescriptor) -> bool {
  !platform.arch.is_x86_family()
}

fn is_macos(platform: &PlatformDescriptor) -> bool {
  platform.os == Os::Macos
}

pub const OVERRIDE_RULES: &[OverrideRule] = &[
  OverrideRule {
    reason: "Cg is only distributed for x86 architectures",
    applies: lacks_x86_marker,
    option: WITH_CG,
    value: OptionValue::Bool(false),
  },
  OverrideRule {
    reason: "Cg is not supported on Macos",
    applies: is_macos,
    option: WITH_CG,
    value: OptionValue::Bool(false),
  },
  OverrideRule {
    reason: "SDL2 has no X11 video backend on Macos",
    applies: is_macos,
    option: SDL2_X11_VIDEO,
    value: OptionValue::Bool(false),
  },
];
