//! Recipe options.
//!
//! An [`OptionSet`] maps every declared option (see [`schema::SCHEMA`]) to a value
//! from its enumerated domain. Sets are built from the user's requested values on
//! top of the schema defaults; an unknown name or out-of-domain value is rejected
//! before anything else happens.

pub mod schema;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use schema::{HLMS_MOBILE, OptionDecl, SCHEMA};

/// Configuration errors in the requested options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
  #[error("unknown option '{name}'")]
  Unknown { name: String },

  #[error("invalid value '{value}' for option '{name}' (expected one of: {expected})")]
  InvalidValue {
    name: String,
    value: String,
    expected: String,
  },

  #[error("malformed option assignment '{0}' (expected name=value)")]
  Malformed(String),
}

/// A resolved option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionValue {
  Bool(bool),
  Choice(&'static str),
}

impl OptionValue {
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      OptionValue::Bool(b) => Some(*b),
      OptionValue::Choice(_) => None,
    }
  }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OptionValue::Bool(true) => write!(f, "True"),
      OptionValue::Bool(false) => write!(f, "False"),
      OptionValue::Choice(choice) => write!(f, "{}", choice),
    }
  }
}

impl Serialize for OptionValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Which pair of HLMS modules the package links against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HlmsVariant {
  Desktop,
  Mobile,
}

/// A complete mapping of option names to values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionSet {
  values: BTreeMap<&'static str, OptionValue>,
}

impl Default for OptionSet {
  fn default() -> Self {
    Self {
      values: SCHEMA.iter().map(|decl| (decl.name, decl.default)).collect(),
    }
  }
}

impl OptionSet {
  /// Build a set from requested `name -> value` pairs layered over the defaults.
  pub fn from_requested<'a, I>(requested: I) -> Result<Self, OptionError>
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    let mut set = Self::default();
    for (name, raw) in requested {
      let decl = lookup(name)?;
      let value = decl.domain.parse(raw).ok_or_else(|| OptionError::InvalidValue {
        name: name.to_string(),
        value: raw.to_string(),
        expected: decl.domain.describe(),
      })?;
      set.values.insert(decl.name, value);
    }
    Ok(set)
  }

  /// Parse `name=value` assignments, as given on the command line.
  pub fn parse_assignment(assignment: &str) -> Result<(String, String), OptionError> {
    match assignment.split_once('=') {
      Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.trim().to_string())),
      _ => Err(OptionError::Malformed(assignment.to_string())),
    }
  }

  pub fn get(&self, name: &str) -> Option<OptionValue> {
    self.values.get(name).copied()
  }

  /// Replace a value, checking it against the option's domain.
  pub fn set(&mut self, name: &str, value: OptionValue) -> Result<(), OptionError> {
    let decl = lookup(name)?;
    if !decl.domain.contains(&value) {
      return Err(OptionError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        expected: decl.domain.describe(),
      });
    }
    self.values.insert(decl.name, value);
    Ok(())
  }

  /// Boolean option lookup; non-boolean or missing options read as false.
  pub fn flag(&self, name: &str) -> bool {
    self.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
  }

  pub fn shared(&self) -> bool {
    self.flag(schema::SHARED)
  }

  pub fn use_boost(&self) -> bool {
    self.flag(schema::USE_BOOST)
  }

  pub fn with_cg(&self) -> bool {
    self.flag(schema::WITH_CG)
  }

  pub fn with_metal(&self) -> bool {
    self.flag(schema::WITH_METAL)
  }

  pub fn hlms(&self) -> HlmsVariant {
    match self.get(schema::HLMS_TYPE) {
      Some(OptionValue::Choice(HLMS_MOBILE)) => HlmsVariant::Mobile,
      _ => HlmsVariant::Desktop,
    }
  }

  /// Sub-options declared for a dependency, keyed by the unscoped name.
  pub fn scoped(&self, dependency: &str) -> BTreeMap<String, String> {
    self
      .values
      .iter()
      .filter_map(|(name, value)| {
        let (dep, option) = name.split_once(':')?;
        (dep == dependency).then(|| (option.to_string(), value.to_string()))
      })
      .collect()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, OptionValue)> + '_ {
    self.values.iter().map(|(name, value)| (*name, *value))
  }
}

fn lookup(name: &str) -> Result<&'static OptionDecl, OptionError> {
  schema::declaration(name).ok_or_else(|| OptionError::Unknown { name: name.to_string() })
}
