//! The declared option schema of the recipe.

use super::OptionValue;

/// The set of values an option may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDomain {
  Bool,
  Choice(&'static [&'static str]),
}

impl OptionDomain {
  /// Parse a raw value into this domain, returning its canonical form.
  pub fn parse(&self, raw: &str) -> Option<OptionValue> {
    match self {
      OptionDomain::Bool => match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(OptionValue::Bool(true)),
        "false" | "0" => Some(OptionValue::Bool(false)),
        _ => None,
      },
      OptionDomain::Choice(choices) => choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(raw))
        .map(|choice| OptionValue::Choice(*choice)),
    }
  }

  pub fn contains(&self, value: &OptionValue) -> bool {
    match (self, value) {
      (OptionDomain::Bool, OptionValue::Bool(_)) => true,
      (OptionDomain::Choice(choices), OptionValue::Choice(choice)) => choices.contains(choice),
      _ => false,
    }
  }

  /// Human-readable list of accepted values, used in error messages.
  pub fn describe(&self) -> String {
    match self {
      OptionDomain::Bool => "True, False".to_string(),
      OptionDomain::Choice(choices) => choices.join(", "),
    }
  }
}

/// One declared option.
#[derive(Debug, Clone, Copy)]
pub struct OptionDecl {
  pub name: &'static str,
  pub domain: OptionDomain,
  pub default: OptionValue,
}

pub const SHARED: &str = "shared";
pub const USE_BOOST: &str = "use_boost";
pub const WITH_CG: &str = "with_cg";
pub const WITH_METAL: &str = "with_metal";
pub const HLMS_TYPE: &str = "hlms_type";
pub const FREETYPE_SHARED: &str = "freetype:shared";
pub const SDL2_X11_VIDEO: &str = "SDL2:x11_video";

pub const HLMS_DESKTOP: &str = "desktop";
pub const HLMS_MOBILE: &str = "mobile";

/// Every option the recipe accepts, in declaration order.
///
/// Names containing `:` are sub-options of the dependency named before the colon.
pub const SCHEMA: &[OptionDecl] = &[
  OptionDecl {
    name: SHARED,
    domain: OptionDomain::Bool,
    default: OptionValue::Bool(true),
  },
  OptionDecl {
    name: USE_BOOST,
    domain: OptionDomain::Bool,
    default: OptionValue::Bool(true),
  },
  OptionDecl {
    name: WITH_CG,
    domain: OptionDomain::Bool,
    default: OptionValue::Bool(true),
  },
  OptionDecl {
    name: WITH_METAL,
    domain: OptionDomain::Bool,
    default: OptionValue::Bool(false),
  },
  OptionDecl {
    name: HLMS_TYPE,
    domain: OptionDomain::Choice(&[HLMS_DESKTOP, HLMS_MOBILE]),
    default: OptionValue::Choice(HLMS_DESKTOP),
  },
  OptionDecl {
    name: FREETYPE_SHARED,
    domain: OptionDomain::Bool,
    default: OptionValue::Bool(false),
  },
  OptionDecl {
    name: SDL2_X11_VIDEO,
    domain: OptionDomain::Bool,
    default: OptionValue::Bool(true),
  },
];

/// Look up an option declaration by name.
pub fn declaration(name: &str) -> Option<&'static OptionDecl> {
  SCHEMA.iter().find(|decl| decl.name == name)
}
