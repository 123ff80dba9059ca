//! ogrepkg-lib: build configuration and packaging for OGRE
//!
//! The crate maps a target platform and a set of feature options to everything
//! needed to produce a consumable package:
//! - `resolve`: platform-forced option overrides and the dependency set
//! - `translate`: the flat configuration handed to the native build tool
//! - `collect`: artifact collection, link metadata and the package manifest
//! - `pipeline`: the end-to-end run over the `external` collaborators

pub mod collect;
pub mod external;
pub mod options;
pub mod pipeline;
pub mod platform;
pub mod profile;
pub mod recipe;
pub mod resolve;
pub mod translate;
