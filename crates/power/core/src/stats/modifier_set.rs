//! Per-attribute modifier collection and the stacking algorithm.
//!
//! The stack is applied in this order:
//! Override (short-circuit) → Flat → %Inc → More
//!
//! ```text
//! result = (base + flat_sum) × (1 + inc_sum/100) × Π(1 + more_i/100)
//! ```

use super::modifier::{Modifier, ModifierId, ModifierKind};

/// All modifiers targeting one attribute.
///
/// Modifiers are keyed by id; insertion order is preserved so that equal
/// priorities resolve deterministically.
///
/// # Example
/// ```
/// # use power_core::stats::{Modifier, ModifierSet};
/// let mut set = ModifierSet::new();
/// set.add(Modifier::flat("ring", 5.0));          // +5
/// set.add(Modifier::increased("belt", 20.0));    // +20%
/// set.add(Modifier::increased("passive", 30.0)); // +30% (summed)
/// set.add(Modifier::more("aura", 50.0));         // ×1.5
///
/// // (10 + 5) × 1.5 × 1.5 = 33.75
/// assert!((set.apply(10.0) - 33.75).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierSet {
    modifiers: Vec<Modifier>,
}

/// Intermediate values of one stack evaluation, for tooltips and debugging.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StackBreakdown {
    pub base: f64,
    /// Sum of active Flat modifiers.
    pub flat: f64,
    /// Sum of active Increased percentages.
    pub increased: f64,
    /// Product of all `1 + more/100` factors.
    pub more: f64,
    /// Winning override, if any. When set, `total` equals it.
    pub override_value: Option<f64>,
    pub total: f64,
}

impl ModifierSet {
    /// Create a new empty modifier set
    pub fn new() -> Self {
        Self {
            modifiers: Vec::new(),
        }
    }

    /// Add a modifier, replacing any existing modifier with the same id.
    ///
    /// Returns the replaced modifier.
    pub fn add(&mut self, modifier: Modifier) -> Option<Modifier> {
        match self.modifiers.iter_mut().find(|m| m.id == modifier.id) {
            Some(slot) => Some(core::mem::replace(slot, modifier)),
            None => {
                self.modifiers.push(modifier);
                None
            }
        }
    }

    /// Remove a modifier by id.
    pub fn remove(&mut self, id: &ModifierId) -> Option<Modifier> {
        let index = self.modifiers.iter().position(|m| &m.id == id)?;
        Some(self.modifiers.remove(index))
    }

    /// Remove every modifier of the given kind, returning how many were removed.
    pub fn remove_by_kind(&mut self, kind: ModifierKind) -> usize {
        self.retain_counting(|m| m.kind != kind)
    }

    /// Remove every modifier carrying the given source tag.
    pub fn remove_by_source(&mut self, source: &str) -> usize {
        self.retain_counting(|m| m.source != source)
    }

    fn retain_counting(&mut self, keep: impl FnMut(&Modifier) -> bool) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(keep);
        before - self.modifiers.len()
    }

    pub fn clear(&mut self) {
        self.modifiers.clear();
    }

    /// Look up a modifier by id, active or not.
    pub fn get(&self, id: &ModifierId) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| &m.id == id)
    }

    /// Toggle a modifier. Returns false if the id is unknown.
    pub fn set_active(&mut self, id: &ModifierId, active: bool) -> bool {
        match self.modifiers.iter_mut().find(|m| &m.id == id) {
            Some(m) => {
                m.active = active;
                true
            }
            None => false,
        }
    }

    /// Change a modifier's value in place. Returns false if the id is unknown.
    pub fn set_value(&mut self, id: &ModifierId, value: f64) -> bool {
        match self.modifiers.iter_mut().find(|m| &m.id == id) {
            Some(m) => {
                m.value = value;
                true
            }
            None => false,
        }
    }

    /// All active modifiers, in insertion order.
    pub fn get_all(&self) -> Vec<&Modifier> {
        self.modifiers.iter().filter(|m| m.active).collect()
    }

    /// Active modifiers of one kind, in insertion order.
    pub fn get_by_kind(&self, kind: ModifierKind) -> Vec<&Modifier> {
        self.modifiers
            .iter()
            .filter(|m| m.active && m.kind == kind)
            .collect()
    }

    /// Iterate over every stored modifier, including inactive ones.
    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.modifiers.iter()
    }

    /// Number of stored modifiers, including inactive ones.
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Active modifiers sorted by priority, highest first.
    ///
    /// The sort is stable: equal priorities keep insertion order.
    fn sorted_active(&self) -> Vec<&Modifier> {
        let mut active = self.get_all();
        active.sort_by(|a, b| b.priority.cmp(&a.priority));
        active
    }

    /// Apply all active modifiers to a base value.
    ///
    /// # Formula
    /// ```text
    /// override present → highest-priority override value
    /// otherwise        → (base + flat_sum) × (1 + inc_sum/100) × Π(1 + more_i/100)
    /// ```
    pub fn apply(&self, base: f64) -> f64 {
        self.breakdown(base).total
    }

    /// Apply all active modifiers and report the intermediate sums.
    pub fn breakdown(&self, base: f64) -> StackBreakdown {
        let sorted = self.sorted_active();

        // Override short-circuits everything, whatever the other kinds' priorities
        if let Some(winner) = sorted.iter().find(|m| m.kind == ModifierKind::Override) {
            return StackBreakdown {
                base,
                flat: 0.0,
                increased: 0.0,
                more: 1.0,
                override_value: Some(winner.value),
                total: winner.value,
            };
        }

        // Step 1: base + Σ flat
        let flat: f64 = sorted
            .iter()
            .filter(|m| m.kind == ModifierKind::Flat)
            .map(|m| m.value)
            .sum();
        let mut value = base + flat;

        // Step 2: one multiplication for the summed %Inc
        let increased: f64 = sorted
            .iter()
            .filter(|m| m.kind == ModifierKind::Increased)
            .map(|m| m.value)
            .sum();
        if increased != 0.0 {
            value *= 1.0 + increased / 100.0;
        }

        // Step 3: More multipliers compound one by one
        let more = sorted
            .iter()
            .filter(|m| m.kind == ModifierKind::More)
            .fold(1.0, |acc, m| acc * (1.0 + m.value / 100.0));
        value *= more;

        StackBreakdown {
            base,
            flat,
            increased,
            more,
            override_value: None,
            total: value,
        }
    }
}
