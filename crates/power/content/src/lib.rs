//! Data-driven power content and loaders.
//!
//! This crate houses the built-in derived-attribute rules and provides
//! loaders for RON/TOML data files:
//! - Affix catalogs (data-driven via RON)
//! - Derived-attribute rules (data-driven via RON)
//! - Power configuration: weighting constants and generator presets (TOML)
//!
//! All loaders use power-core types directly with serde for RON/TOML deserialization.

pub mod rules;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use rules::{DerivedRule, DerivedRules};

#[cfg(feature = "loaders")]
pub use loaders::{AffixCatalog, AffixLoader, ConfigLoader, ContentFactory, LoadMode, RulesLoader};
