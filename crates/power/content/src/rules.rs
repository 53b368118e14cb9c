//! Derived-attribute rules.
//!
//! A rule computes one attribute as a weighted sum of others, e.g.
//! `max_health = 50 + 10 × vitality + 2 × strength`. Rules become
//! [`Formula::WeightedSum`] values installed on an [`AttributeManager`].
//!
//! A derived attribute is fully owned by its rule: modifiers registered on
//! it are ignored, so affix content should target the inputs instead.

use power_core::{AttributeKind, AttributeManager, Formula, StatError};

/// `attribute = base + Σ value(term) × weight`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedRule {
    pub attribute: AttributeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: f64,
    pub terms: Vec<(AttributeKind, f64)>,
}

impl DerivedRule {
    pub fn new(attribute: AttributeKind, base: f64, terms: &[(AttributeKind, f64)]) -> Self {
        Self {
            attribute,
            base,
            terms: terms.to_vec(),
        }
    }

    pub fn to_formula(&self) -> Formula {
        Formula::WeightedSum {
            base: self.base,
            terms: self.terms.clone(),
        }
    }
}

/// An ordered collection of derived-attribute rules.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedRules {
    pub rules: Vec<DerivedRule>,
}

impl DerivedRules {
    pub fn new(rules: Vec<DerivedRule>) -> Self {
        Self { rules }
    }

    /// Built-in rules used when no rules file is supplied.
    pub fn standard() -> Self {
        use AttributeKind::*;
        Self::new(vec![
            DerivedRule::new(MaxHealth, 50.0, &[(Vitality, 10.0), (Strength, 2.0)]),
            DerivedRule::new(MaxMana, 30.0, &[(Intelligence, 8.0)]),
            DerivedRule::new(HealthRegen, 1.0, &[(Vitality, 0.2)]),
            DerivedRule::new(ManaRegen, 1.0, &[(Intelligence, 0.25)]),
            DerivedRule::new(Accuracy, 0.0, &[(Dexterity, 2.0)]),
        ])
    }

    pub fn get(&self, attribute: AttributeKind) -> Option<&DerivedRule> {
        self.rules.iter().find(|r| r.attribute == attribute)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Install every rule as a formula, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first rule that would create a formula cycle; rules
    /// installed before it stay installed.
    pub fn install(&self, manager: &AttributeManager) -> Result<(), StatError> {
        for rule in &self.rules {
            manager.set_formula(rule.attribute, rule.to_formula())?;
        }
        tracing::debug!(rules = self.rules.len(), "derived attribute rules installed");
        Ok(())
    }
}
