//! Affix definitions.
//!
//! Templates are authored as content data, validated once at load time and
//! then shared immutably (behind `Arc`) by pools, registries and every
//! instance rolled from them.

use super::error::AffixError;
use super::requirements::Requirements;
use crate::stats::{AttributeKind, ModifierKind};

/// Placement category of an affix.
///
/// Only prefixes and suffixes count against an item's affix limits.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
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
pub enum AffixCategory {
    Prefix,
    Suffix,
    Implicit,
    Enchantment,
}

impl AffixCategory {
    /// Categories subject to per-item count limits.
    pub const CAPPED: [AffixCategory; 2] = [AffixCategory::Prefix, AffixCategory::Suffix];

    pub const fn is_capped(&self) -> bool {
        matches!(self, AffixCategory::Prefix | AffixCategory::Suffix)
    }
}

/// One modifier an affix grants, with its roll range.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierTemplate {
    pub attribute: AttributeKind,
    #[cfg_attr(feature = "serde", serde(rename = "mod_type"))]
    pub kind: ModifierKind,
    pub min: f64,
    pub max: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
}

impl ModifierTemplate {
    pub fn new(attribute: AttributeKind, kind: ModifierKind, min: f64, max: f64) -> Self {
        Self {
            attribute,
            kind,
            min,
            max,
            priority: 0,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Map a unit draw `t ∈ [0, 1]` into `[min, max]`.
    pub fn lerp(&self, t: f64) -> f64 {
        self.clamp_value(self.min + (self.max - self.min) * t)
    }

    /// Pull `value` into `[min, max]`. Never panics, even on an inverted range.
    pub fn clamp_value(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Normalised position of `value` in the range, clamped to `[0, 1]`.
    ///
    /// A degenerate range (`min == max`) is always at full quality.
    pub fn quality_of(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 1.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// An immutable affix definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffixTemplate {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub category: AffixCategory,
    /// Mutual-exclusion group; affixes sharing a group never coexist on an item.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<String>,
    /// Hidden power level in `[1, 100]`.
    pub rank: u8,
    /// Base selection weight.
    pub weight: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    pub modifiers: Vec<ModifierTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requirements: Option<Requirements>,
}

impl AffixTemplate {
    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 100;

    /// Create a rank-1, weight-100 template with no modifiers yet.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: AffixCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            group: None,
            rank: Self::MIN_RANK,
            weight: 100,
            description: String::new(),
            tags: Vec::new(),
            modifiers: Vec::new(),
            requirements: None,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_rank(mut self, rank: u8) -> Self {
        self.rank = rank;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_owned()).collect();
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: ModifierTemplate) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    /// The mutual-exclusion group, treating an empty string as no group.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref().filter(|g| !g.is_empty())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check the definition for authoring mistakes.
    pub fn validate(&self) -> Result<(), AffixError> {
        let invalid = |reason: String| AffixError::InvalidTemplate {
            id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id is empty".into()));
        }
        if !(Self::MIN_RANK..=Self::MAX_RANK).contains(&self.rank) {
            return Err(invalid(format!(
                "rank {} outside [{}, {}]",
                self.rank,
                Self::MIN_RANK,
                Self::MAX_RANK
            )));
        }
        if self.modifiers.is_empty() {
            return Err(invalid("no modifiers".into()));
        }
        for (index, modifier) in self.modifiers.iter().enumerate() {
            if !modifier.min.is_finite() || !modifier.max.is_finite() {
                return Err(invalid(format!("modifier {index} has a non-finite bound")));
            }
            if modifier.min > modifier.max {
                return Err(invalid(format!(
                    "modifier {index} has min {} > max {}",
                    modifier.min, modifier.max
                )));
            }
        }
        if let Some(req) = &self.requirements
            && let Some(max_level) = req.max_level
            && req.min_level > max_level
        {
            return Err(invalid(format!(
                "min_level {} > max_level {max_level}",
                req.min_level
            )));
        }
        Ok(())
    }

    /// Render the description, replacing `{0}`, `{1}`, ... with rolled values.
    ///
    /// Placeholders without a matching value are left as written.
    pub fn describe(&self, values: &[f64]) -> String {
        let mut out = String::with_capacity(self.description.len());
        let mut rest = self.description.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                let value = values.get(index)?;
                Some((close, *value))
            });
            match substituted {
                Some((close, value)) => {
                    out.push_str(&format_value(value));
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
