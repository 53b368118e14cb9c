//! Modifier value types.
//!
//! A [`Modifier`] is a single numeric adjustment to an attribute. Modifiers are
//! categorized by their application kind:
//! - **Flat**: Additive, summed onto the base value
//! - **Increased**: Percentage, summed across modifiers then applied once
//! - **More**: Percentage, applied multiplicatively one modifier at a time
//! - **Override**: Replaces the computed value outright
//!
//! # Ownership
//!
//! Modifiers are plain values. The attribute layer stores its own copy of every
//! modifier it receives; the affix layer keeps the rolled numbers that produced
//! it. Live gameplay edits (toggling a buff, scaling an aura) go through
//! [`AttributeManager::set_modifier_active`](super::AttributeManager::set_modifier_active)
//! and [`AttributeManager::set_modifier_value`](super::AttributeManager::set_modifier_value)
//! so that cached values are invalidated.

use core::fmt;

use super::kind::AttributeKind;

/// How a modifier is combined with the base value.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierKind {
    /// Flat additive bonus (applied first)
    Flat,

    /// Percentage increase (summed with other Increased, then multiplied once)
    /// Stored as percentage (e.g., 20.0 = +20%)
    Increased,

    /// Multiplicative "more" modifier (applied sequentially)
    /// Stored as percentage (e.g., 50.0 = ×1.5, -20.0 = ×0.8)
    More,

    /// Replaces the computed value; the highest-priority override wins
    Override,
}

/// Identifier of a modifier within one attribute's modifier set.
///
/// Re-adding a modifier with an existing id replaces it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModifierId(String);

impl ModifierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModifierId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModifierId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single adjustment to an attribute value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub id: ModifierId,
    pub kind: ModifierKind,
    pub value: f64,
    /// Free-form origin tag (affix id, buff name, passive node...).
    pub source: String,
    /// Higher priorities are evaluated first; only matters for Override.
    pub priority: i32,
    pub active: bool,
}

impl Modifier {
    /// Create an active modifier with no source and priority 0.
    pub fn new(id: impl Into<ModifierId>, kind: ModifierKind, value: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            value,
            source: String::new(),
            priority: 0,
            active: true,
        }
    }

    /// Create a flat modifier
    pub fn flat(id: impl Into<ModifierId>, value: f64) -> Self {
        Self::new(id, ModifierKind::Flat, value)
    }

    /// Create a percentage increase (20.0 = +20%)
    pub fn increased(id: impl Into<ModifierId>, percent: f64) -> Self {
        Self::new(id, ModifierKind::Increased, percent)
    }

    /// Create a "more" multiplier (50.0 = ×1.5)
    pub fn more(id: impl Into<ModifierId>, percent: f64) -> Self {
        Self::new(id, ModifierKind::More, percent)
    }

    /// Create an override that pins the attribute to `value`
    pub fn overriding(id: impl Into<ModifierId>, value: f64) -> Self {
        Self::new(id, ModifierKind::Override, value)
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// A modifier together with the attribute it targets.
///
/// This is the unit the affix layer hands to the equipment layer, which in
/// turn applies it to (or retracts it from) the wearer's attribute manager.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeModifier {
    pub attribute: AttributeKind,
    pub modifier: Modifier,
}

impl AttributeModifier {
    pub fn new(attribute: AttributeKind, modifier: Modifier) -> Self {
        Self {
            attribute,
            modifier,
        }
    }
}
