//! Attribute system - live character statistics.
//!
//! # Architecture
//!
//! ```text
//! [ Modifier ]          single adjustment (Flat / Increased / More / Override)
//!      ↓
//! [ ModifierSet ]       per-attribute stack, applied to a base value
//!      ↓
//! [ Formula ]           derived attribute computed from other attributes
//!      ↓
//! [ AttributeManager ]  base values + stacks + formulas, cached per attribute
//! ```
//!
//! ## Stack Order
//!
//! `Override → Flat → %Inc → More`
//!
//! An active override short-circuits the stack; otherwise flat bonuses are
//! summed onto the base, increased percentages are summed and applied once,
//! and each more multiplier is applied individually.

pub mod error;
pub mod formula;
pub mod kind;
pub mod manager;
pub mod modifier;
pub mod modifier_set;

pub use error::StatError;
pub use formula::{AttributeReader, Formula, FormulaFn};
pub use kind::AttributeKind;
pub use manager::{AttributeManager, AttributeSnapshot};
pub use modifier::{AttributeModifier, Modifier, ModifierId, ModifierKind};
pub use modifier_set::{ModifierSet, StackBreakdown};
