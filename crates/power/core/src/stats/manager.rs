//! AttributeManager - live attribute values for one entity.
//!
//! The manager owns base values, per-attribute modifier sets and formulas,
//! and serves cached current values.
//!
//! # Caching
//!
//! An attribute is *dirty* exactly when it has no cache entry. Every mutation
//! of an attribute's base value, modifiers or formula evicts its cache entry
//! and, transitively, the entries of every formula that reads it (directly or
//! through other formulas).
//!
//! Reads take the shared lock; a cache miss is recomputed outside any lock
//! (formulas recurse back into [`AttributeManager::get`]) and then stored
//! under the exclusive lock. Concurrent readers may recompute the same value
//! redundantly; that only costs cycles. A global epoch counter is bumped by
//! every mutation, and a recomputed value is only cached if the epoch did not
//! move while it was being computed, so a value computed from stale inputs is
//! returned to its caller but never stored as fresh.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::error::StatError;
use super::formula::{AttributeReader, Formula};
use super::kind::AttributeKind;
use super::modifier::{AttributeModifier, Modifier, ModifierId, ModifierKind};
use super::modifier_set::{ModifierSet, StackBreakdown};

/// Computed values keyed by attribute, as produced by [`AttributeManager::snapshot`].
pub type AttributeSnapshot = BTreeMap<AttributeKind, f64>;

#[derive(Clone, Debug, Default)]
struct ManagerState {
    base: HashMap<AttributeKind, f64>,
    modifiers: HashMap<AttributeKind, ModifierSet>,
    formulas: HashMap<AttributeKind, Formula>,
    /// Reverse dependency index: attribute → formulas that read it.
    dependents: HashMap<AttributeKind, BTreeSet<AttributeKind>>,
    cache: HashMap<AttributeKind, f64>,
    epoch: u64,
}

impl ManagerState {
    fn base(&self, attribute: AttributeKind) -> f64 {
        self.base.get(&attribute).copied().unwrap_or(0.0)
    }

    fn stacked(&self, attribute: AttributeKind) -> f64 {
        let base = self.base(attribute);
        match self.modifiers.get(&attribute) {
            Some(set) => set.apply(base),
            None => base,
        }
    }

    /// Evict `attribute` and every formula that transitively depends on it.
    fn invalidate(&mut self, attribute: AttributeKind) {
        self.epoch = self.epoch.wrapping_add(1);

        let mut pending = vec![attribute];
        let mut seen = BTreeSet::new();
        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            self.cache.remove(&current);
            if let Some(dependents) = self.dependents.get(&current) {
                pending.extend(dependents.iter().copied());
            }
        }
    }

    /// Returns the first attribute through which `deps` reach `target`.
    fn find_cycle(&self, target: AttributeKind, deps: &[AttributeKind]) -> Option<AttributeKind> {
        for &start in deps {
            let mut pending = vec![start];
            let mut seen = BTreeSet::new();
            while let Some(current) = pending.pop() {
                if current == target {
                    return Some(start);
                }
                if !seen.insert(current) {
                    continue;
                }
                if let Some(formula) = self.formulas.get(&current) {
                    pending.extend(formula.dependencies());
                }
            }
        }
        None
    }

    fn unlink(&mut self, attribute: AttributeKind, formula: &Formula) {
        for dep in formula.dependencies() {
            if let Some(dependents) = self.dependents.get_mut(&dep) {
                dependents.remove(&attribute);
                if dependents.is_empty() {
                    self.dependents.remove(&dep);
                }
            }
        }
    }

    fn modifier_set(&mut self, attribute: AttributeKind) -> &mut ModifierSet {
        self.modifiers.entry(attribute).or_default()
    }
}

enum Pending {
    Formula(Formula),
    Value(f64),
}

/// Live attribute values for one entity.
///
/// # Example
///
/// ```
/// # use power_core::stats::{AttributeKind, AttributeManager, Formula, Modifier};
/// let stats = AttributeManager::new();
/// stats
///     .set_formula(
///         AttributeKind::MaxHealth,
///         Formula::weighted_sum(50.0, &[AttributeKind::Vitality], &[10.0]),
///     )
///     .unwrap();
/// stats.set_base(AttributeKind::Vitality, 10.0);
/// assert_eq!(stats.get(AttributeKind::MaxHealth), 150.0);
///
/// stats.add_modifier(AttributeKind::Vitality, Modifier::flat("belt", 5.0));
/// assert_eq!(stats.get(AttributeKind::MaxHealth), 200.0);
/// ```
#[derive(Debug, Default)]
pub struct AttributeManager {
    state: RwLock<ManagerState>,
}

impl Clone for AttributeManager {
    fn clone(&self) -> Self {
        Self {
            state: RwLock::new(self.read().clone()),
        }
    }
}

impl AttributeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager seeded with base values.
    pub fn with_bases(bases: impl IntoIterator<Item = (AttributeKind, f64)>) -> Self {
        let manager = Self::new();
        for (attribute, value) in bases {
            manager.set_base(attribute, value);
        }
        manager
    }

    fn read(&self) -> RwLockReadGuard<'_, ManagerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ManagerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== reads =====

    /// Current value of an attribute.
    ///
    /// Formula-valued attributes return the formula's result; otherwise the
    /// modifier stack is applied to the base value. Unknown attributes read
    /// as zero.
    pub fn get(&self, attribute: AttributeKind) -> f64 {
        let (epoch, pending) = {
            let state = self.read();
            if let Some(value) = state.cache.get(&attribute) {
                return *value;
            }
            let pending = match state.formulas.get(&attribute) {
                Some(formula) => Pending::Formula(formula.clone()),
                None => Pending::Value(state.stacked(attribute)),
            };
            (state.epoch, pending)
        };

        let value = match pending {
            Pending::Formula(formula) => formula.calculate(self),
            Pending::Value(value) => value,
        };

        let mut state = self.write();
        if state.epoch == epoch {
            state.cache.insert(attribute, value);
        }
        value
    }

    /// Base value of an attribute (zero when unset).
    pub fn base(&self, attribute: AttributeKind) -> f64 {
        self.read().base(attribute)
    }

    /// Every modifier registered on an attribute, including inactive ones.
    pub fn modifiers(&self, attribute: AttributeKind) -> Vec<Modifier> {
        self.read()
            .modifiers
            .get(&attribute)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_formula(&self, attribute: AttributeKind) -> bool {
        self.read().formulas.contains_key(&attribute)
    }

    /// Stack breakdown of a modifier-driven attribute.
    ///
    /// Returns `None` for formula-valued attributes, whose value does not come
    /// from the modifier stack.
    pub fn breakdown(&self, attribute: AttributeKind) -> Option<StackBreakdown> {
        let state = self.read();
        if state.formulas.contains_key(&attribute) {
            return None;
        }
        let base = state.base(attribute);
        Some(match state.modifiers.get(&attribute) {
            Some(set) => set.breakdown(base),
            None => ModifierSet::new().breakdown(base),
        })
    }

    /// Every attribute with a base value, formula or modifier set, sorted.
    pub fn attributes(&self) -> Vec<AttributeKind> {
        let state = self.read();
        let keys: BTreeSet<AttributeKind> = state
            .base
            .keys()
            .chain(state.formulas.keys())
            .chain(state.modifiers.keys())
            .copied()
            .collect();
        keys.into_iter().collect()
    }

    // ===== mutations =====

    pub fn set_base(&self, attribute: AttributeKind, value: f64) {
        let mut state = self.write();
        state.base.insert(attribute, value);
        state.invalidate(attribute);
    }

    /// Add a modifier, replacing any modifier with the same id on that attribute.
    pub fn add_modifier(&self, attribute: AttributeKind, modifier: Modifier) -> Option<Modifier> {
        let mut state = self.write();
        let replaced = state.modifier_set(attribute).add(modifier);
        state.invalidate(attribute);
        replaced
    }

    pub fn remove_modifier(&self, attribute: AttributeKind, id: &ModifierId) -> Option<Modifier> {
        let mut state = self.write();
        let removed = state.modifiers.get_mut(&attribute)?.remove(id);
        if removed.is_some() {
            state.invalidate(attribute);
        }
        removed
    }

    /// Remove every modifier of `kind` from an attribute.
    pub fn remove_all_modifiers(&self, attribute: AttributeKind, kind: ModifierKind) -> usize {
        let mut state = self.write();
        let removed = state
            .modifiers
            .get_mut(&attribute)
            .map_or(0, |set| set.remove_by_kind(kind));
        if removed > 0 {
            state.invalidate(attribute);
        }
        removed
    }

    /// Remove every modifier carrying `source`, across all attributes.
    pub fn remove_modifiers_from_source(&self, source: &str) -> usize {
        let mut state = self.write();
        let mut touched = Vec::new();
        let mut removed = 0;
        for (attribute, set) in state.modifiers.iter_mut() {
            let count = set.remove_by_source(source);
            if count > 0 {
                touched.push(*attribute);
                removed += count;
            }
        }
        for attribute in touched {
            state.invalidate(attribute);
        }
        removed
    }

    /// Toggle a registered modifier. Returns false if it does not exist.
    pub fn set_modifier_active(
        &self,
        attribute: AttributeKind,
        id: &ModifierId,
        active: bool,
    ) -> bool {
        let mut state = self.write();
        let found = state
            .modifiers
            .get_mut(&attribute)
            .is_some_and(|set| set.set_active(id, active));
        if found {
            state.invalidate(attribute);
        }
        found
    }

    /// Change a registered modifier's value in place. Returns false if it does not exist.
    pub fn set_modifier_value(&self, attribute: AttributeKind, id: &ModifierId, value: f64) -> bool {
        let mut state = self.write();
        let found = state
            .modifiers
            .get_mut(&attribute)
            .is_some_and(|set| set.set_value(id, value));
        if found {
            state.invalidate(attribute);
        }
        found
    }

    /// Register a batch of modifiers (typically everything an item grants).
    pub fn apply_modifiers(&self, modifiers: &[AttributeModifier]) {
        let mut state = self.write();
        for entry in modifiers {
            state.modifier_set(entry.attribute).add(entry.modifier.clone());
        }
        for entry in modifiers {
            state.invalidate(entry.attribute);
        }
    }

    /// Remove a batch previously registered with [`apply_modifiers`](Self::apply_modifiers).
    ///
    /// Returns how many modifiers were actually removed.
    pub fn retract_modifiers(&self, modifiers: &[AttributeModifier]) -> usize {
        let mut state = self.write();
        let mut removed = 0;
        for entry in modifiers {
            let hit = state
                .modifiers
                .get_mut(&entry.attribute)
                .and_then(|set| set.remove(&entry.modifier.id))
                .is_some();
            if hit {
                removed += 1;
                state.invalidate(entry.attribute);
            }
        }
        removed
    }

    /// Install (or replace) the formula computing `attribute`.
    ///
    /// # Errors
    ///
    /// [`StatError::FormulaCycle`] if the formula would read `attribute`
    /// itself, directly or through other installed formulas. The manager is
    /// left unchanged in that case.
    pub fn set_formula(&self, attribute: AttributeKind, formula: Formula) -> Result<(), StatError> {
        let deps = formula.dependencies();
        let mut state = self.write();

        if let Some(via) = state.find_cycle(attribute, &deps) {
            return Err(StatError::FormulaCycle { attribute, via });
        }

        if let Some(previous) = state.formulas.remove(&attribute) {
            state.unlink(attribute, &previous);
        }
        for dep in &deps {
            state.dependents.entry(*dep).or_default().insert(attribute);
        }
        tracing::debug!(%attribute, ?deps, "formula installed");
        state.formulas.insert(attribute, formula);
        state.invalidate(attribute);
        Ok(())
    }

    pub fn remove_formula(&self, attribute: AttributeKind) -> Option<Formula> {
        let mut state = self.write();
        let formula = state.formulas.remove(&attribute)?;
        state.unlink(attribute, &formula);
        state.invalidate(attribute);
        Some(formula)
    }

    /// Drop every cached value; the next reads recompute from scratch.
    pub fn recalculate_all(&self) {
        let mut state = self.write();
        state.cache.clear();
        state.epoch = state.epoch.wrapping_add(1);
    }

    // ===== persistence =====

    /// Current computed value of every base-valued and formula-valued attribute.
    pub fn snapshot(&self) -> AttributeSnapshot {
        let keys: BTreeSet<AttributeKind> = {
            let state = self.read();
            state
                .base
                .keys()
                .chain(state.formulas.keys())
                .copied()
                .collect()
        };
        keys.into_iter()
            .map(|attribute| (attribute, self.get(attribute)))
            .collect()
    }

    /// Raw base values only, without modifiers or formulas applied.
    pub fn base_snapshot(&self) -> AttributeSnapshot {
        self.read()
            .base
            .iter()
            .map(|(attribute, value)| (*attribute, *value))
            .collect()
    }

    /// Overwrite base values from a snapshot.
    ///
    /// Modifiers and formulas are preserved. Every restored attribute and
    /// every formula is invalidated.
    pub fn restore(&self, snapshot: &AttributeSnapshot) {
        let mut state = self.write();
        for (attribute, value) in snapshot {
            state.base.insert(*attribute, *value);
            state.invalidate(*attribute);
        }
        let formulas: Vec<AttributeKind> = state.formulas.keys().copied().collect();
        for attribute in formulas {
            state.invalidate(attribute);
        }
    }
}

impl AttributeReader for AttributeManager {
    fn get(&self, attribute: AttributeKind) -> f64 {
        AttributeManager::get(self, attribute)
    }
}
