//! Rolled affixes.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use super::error::AffixError;
use super::roll;
use super::template::{AffixCategory, AffixTemplate, ModifierTemplate};
use crate::stats::{AttributeModifier, Modifier, ModifierId};

/// Identity of a rolled affix, stable across rerolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InstanceId(pub u64);

impl InstanceId {
    /// Draw a fresh id from the caller's RNG, so seeded runs are reproducible.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.next_u64())
    }

    /// Id of the `index`-th modifier this instance emits.
    pub fn modifier_id(&self, index: usize) -> ModifierId {
        ModifierId::new(format!("{self}:{index}"))
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A modifier template together with the value rolled for it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RolledModifier {
    pub template: ModifierTemplate,
    pub value: f64,
}

impl RolledModifier {
    pub fn quality(&self) -> f64 {
        self.template.quality_of(self.value)
    }

    fn to_modifier(&self, id: ModifierId, source: &str) -> AttributeModifier {
        let modifier = Modifier::new(id, self.template.kind, self.value)
            .with_source(source)
            .with_priority(self.template.priority);
        AttributeModifier::new(self.template.attribute, modifier)
    }
}

/// Compact persisted form of an instance: its id, template id and values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceRecord {
    pub id: InstanceId,
    pub affix_id: String,
    pub values: Vec<f64>,
}

/// A concrete affix on an item.
///
/// Rerolling changes values only; the id and template binding are fixed for
/// the instance's lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct AffixInstance {
    id: InstanceId,
    template: Arc<AffixTemplate>,
    rolled: Vec<RolledModifier>,
}

impl AffixInstance {
    /// Roll every modifier with the bell-curve method.
    pub fn roll<R: Rng + ?Sized>(template: Arc<AffixTemplate>, rng: &mut R) -> Self {
        let id = InstanceId::random(rng);
        let rolled = template
            .modifiers
            .iter()
            .map(|m| RolledModifier {
                template: m.clone(),
                value: m.lerp(roll::bell_curve(rng)),
            })
            .collect();
        Self {
            id,
            template,
            rolled,
        }
    }

    /// Roll every modifier with a single skewed draw each.
    pub fn roll_biased<R: Rng + ?Sized>(
        template: Arc<AffixTemplate>,
        bias: f64,
        rng: &mut R,
    ) -> Self {
        let id = InstanceId::random(rng);
        let rolled = template
            .modifiers
            .iter()
            .map(|m| RolledModifier {
                template: m.clone(),
                value: m.lerp(roll::biased(rng, bias)),
            })
            .collect();
        Self {
            id,
            template,
            rolled,
        }
    }

    /// Rebuild a persisted instance.
    ///
    /// Values must match the template's modifiers one-to-one; values outside
    /// a modifier's range are clamped into it.
    pub fn restore(
        id: InstanceId,
        template: Arc<AffixTemplate>,
        values: &[f64],
    ) -> Result<Self, AffixError> {
        if values.len() != template.modifiers.len() {
            return Err(AffixError::RolledValueMismatch {
                id: template.id.clone(),
                expected: template.modifiers.len(),
                actual: values.len(),
            });
        }
        let rolled = template
            .modifiers
            .iter()
            .zip(values)
            .map(|(m, value)| RolledModifier {
                template: m.clone(),
                value: m.clamp_value(*value),
            })
            .collect();
        Ok(Self {
            id,
            template,
            rolled,
        })
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn template(&self) -> &Arc<AffixTemplate> {
        &self.template
    }

    pub fn affix_id(&self) -> &str {
        &self.template.id
    }

    pub fn category(&self) -> AffixCategory {
        self.template.category
    }

    pub fn group(&self) -> Option<&str> {
        self.template.group()
    }

    pub fn rolled(&self) -> &[RolledModifier] {
        &self.rolled
    }

    pub fn values(&self) -> Vec<f64> {
        self.rolled.iter().map(|r| r.value).collect()
    }

    pub fn to_record(&self) -> InstanceRecord {
        InstanceRecord {
            id: self.id,
            affix_id: self.template.id.clone(),
            values: self.values(),
        }
    }

    pub fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for rolled in &mut self.rolled {
            rolled.value = rolled.template.lerp(roll::bell_curve(rng));
        }
    }

    pub fn reroll_biased<R: Rng + ?Sized>(&mut self, bias: f64, rng: &mut R) {
        for rolled in &mut self.rolled {
            rolled.value = rolled.template.lerp(roll::biased(rng, bias));
        }
    }

    /// Reroll one modifier, leaving the others untouched.
    pub fn reroll_single<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        rng: &mut R,
    ) -> Result<(), AffixError> {
        let len = self.rolled.len();
        let rolled = self
            .rolled
            .get_mut(index)
            .ok_or(AffixError::ModifierIndexOutOfRange { index, len })?;
        rolled.value = rolled.template.lerp(roll::bell_curve(rng));
        Ok(())
    }

    /// Mean normalised position of the rolled values, in `[0, 1]`.
    ///
    /// An instance without modifiers has quality 0.
    pub fn quality(&self) -> f64 {
        if self.rolled.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.rolled.iter().map(RolledModifier::quality).sum();
        sum / self.rolled.len() as f64
    }

    /// Concrete modifiers for the attribute layer.
    ///
    /// Ids are `"{instance}:{index}"` and the source is the affix id, so an
    /// equipment layer can retract them by id or by source.
    pub fn modifiers(&self) -> Vec<AttributeModifier> {
        self.rolled
            .iter()
            .enumerate()
            .map(|(index, rolled)| rolled.to_modifier(self.id.modifier_id(index), &self.template.id))
            .collect()
    }

    pub fn describe(&self) -> String {
        self.template.describe(&self.values())
    }
}
