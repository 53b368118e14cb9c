//! The affixes on one item, with placement rules.
//!
//! An [`AffixSet`] enforces three invariants on every insertion:
//! - a template appears at most once
//! - a non-empty mutual-exclusion group is held by at most one instance
//! - prefix and suffix counts never exceed their limits
//!
//! Implicit and enchantment affixes are not counted against any limit.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;

use super::error::AffixError;
use super::instance::AffixInstance;
use super::template::AffixCategory;
use crate::config::AffixLimits;
use crate::stats::AttributeModifier;

#[derive(Debug, Default)]
pub struct AffixSet {
    instances: RwLock<Vec<AffixInstance>>,
    limits: AffixLimits,
}

impl Clone for AffixSet {
    fn clone(&self) -> Self {
        Self {
            instances: RwLock::new(self.read().clone()),
            limits: self.limits,
        }
    }
}

impl AffixSet {
    pub fn new(limits: AffixLimits) -> Self {
        Self {
            instances: RwLock::default(),
            limits,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<AffixInstance>> {
        self.instances.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<AffixInstance>> {
        self.instances.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn limits(&self) -> AffixLimits {
        self.limits
    }

    /// Cap for a category, `None` when uncapped.
    pub fn max_of(&self, category: AffixCategory) -> Option<u32> {
        match category {
            AffixCategory::Prefix => Some(self.limits.max_prefixes),
            AffixCategory::Suffix => Some(self.limits.max_suffixes),
            AffixCategory::Implicit | AffixCategory::Enchantment => None,
        }
    }

    pub fn min_of(&self, category: AffixCategory) -> u32 {
        match category {
            AffixCategory::Prefix => self.limits.min_prefixes,
            AffixCategory::Suffix => self.limits.min_suffixes,
            AffixCategory::Implicit | AffixCategory::Enchantment => 0,
        }
    }

    // ===== placement =====

    /// Insert an instance, rejecting duplicates, occupied groups and full
    /// categories.
    pub fn add(&self, instance: AffixInstance) -> Result<(), AffixError> {
        let mut instances = self.write();

        if instances.iter().any(|i| i.affix_id() == instance.affix_id()) {
            return Err(AffixError::AlreadyPresent(instance.affix_id().to_owned()));
        }

        if let Some(group) = instance.group()
            && let Some(holder) = instances.iter().find(|i| i.group() == Some(group))
        {
            return Err(AffixError::GroupOccupied {
                group: group.to_owned(),
                holder: holder.affix_id().to_owned(),
            });
        }

        let category = instance.category();
        if let Some(limit) = self.max_of(category) {
            let count = count_in(&instances, category);
            if count >= limit {
                return Err(AffixError::CategoryFull { category, limit });
            }
        }

        instances.push(instance);
        Ok(())
    }

    /// Remove by template id, freeing its group.
    pub fn remove(&self, affix_id: &str) -> Result<AffixInstance, AffixError> {
        let mut instances = self.write();
        let index = instances
            .iter()
            .position(|i| i.affix_id() == affix_id)
            .ok_or_else(|| AffixError::NotPresent(affix_id.to_owned()))?;
        Ok(instances.remove(index))
    }

    /// Remove every instance, returning them in insertion order.
    pub fn clear(&self) -> Vec<AffixInstance> {
        std::mem::take(&mut *self.write())
    }

    // ===== queries =====

    pub fn get(&self, affix_id: &str) -> Option<AffixInstance> {
        self.read().iter().find(|i| i.affix_id() == affix_id).cloned()
    }

    pub fn contains(&self, affix_id: &str) -> bool {
        self.read().iter().any(|i| i.affix_id() == affix_id)
    }

    pub fn count(&self, category: AffixCategory) -> u32 {
        count_in(&self.read(), category)
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.read().iter().any(|i| i.group() == Some(group))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn instances(&self) -> Vec<AffixInstance> {
        self.read().clone()
    }

    pub fn used_groups(&self) -> BTreeSet<String> {
        self.read()
            .iter()
            .filter_map(|i| i.group().map(str::to_owned))
            .collect()
    }

    pub fn used_ids(&self) -> BTreeSet<String> {
        self.read().iter().map(|i| i.affix_id().to_owned()).collect()
    }

    /// True while `category` is below its configured minimum.
    pub fn need_more(&self, category: AffixCategory) -> bool {
        self.count(category) < self.min_of(category)
    }

    /// True while another affix of `category` would fit.
    pub fn has_room(&self, category: AffixCategory) -> bool {
        self.max_of(category)
            .is_none_or(|limit| self.count(category) < limit)
    }

    /// Every instance's modifiers, flattened in insertion order.
    pub fn all_modifiers(&self) -> Vec<AttributeModifier> {
        self.read()
            .iter()
            .flat_map(AffixInstance::modifiers)
            .collect()
    }

    /// Mean quality of the contained instances; 0 for an empty set.
    pub fn total_quality(&self) -> f64 {
        let instances = self.read();
        if instances.is_empty() {
            return 0.0;
        }
        let sum: f64 = instances.iter().map(AffixInstance::quality).sum();
        sum / instances.len() as f64
    }

    // ===== batch rerolls =====

    pub fn reroll_all<R: Rng + ?Sized>(&self, rng: &mut R) {
        for instance in self.write().iter_mut() {
            instance.reroll(rng);
        }
    }

    pub fn reroll_biased_all<R: Rng + ?Sized>(&self, bias: f64, rng: &mut R) {
        for instance in self.write().iter_mut() {
            instance.reroll_biased(bias, rng);
        }
    }
}

fn count_in(instances: &[AffixInstance], category: AffixCategory) -> u32 {
    let count = instances.iter().filter(|i| i.category() == category).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::affix::instance::InstanceId;
    use crate::affix::template::{AffixTemplate, ModifierTemplate};
    use crate::stats::{AttributeKind, ModifierKind};

    fn instance(id: &str, category: AffixCategory, group: Option<&str>, value: f64) -> AffixInstance {
        let mut template = AffixTemplate::new(id, id, category).with_modifier(
            ModifierTemplate::new(AttributeKind::Armor, ModifierKind::Flat, 0.0, 10.0),
        );
        if let Some(group) = group {
            template = template.with_group(group);
        }
        AffixInstance::restore(InstanceId(id.len() as u64), Arc::new(template), &[value]).unwrap()
    }

    #[test]
    fn prefix_cap_is_enforced() {
        let set = AffixSet::new(AffixLimits::new(2, 2));
        set.add(instance("a", AffixCategory::Prefix, None, 1.0)).unwrap();
        set.add(instance("b", AffixCategory::Prefix, None, 1.0)).unwrap();
        let err = set
            .add(instance("c", AffixCategory::Prefix, None, 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            AffixError::CategoryFull {
                category: AffixCategory::Prefix,
                limit: 2
            }
        );
        assert!(err.is_conflict());
        assert_eq!(set.count(AffixCategory::Prefix), 2);

        set.add(instance("s", AffixCategory::Suffix, None, 1.0)).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn implicits_are_uncapped() {
        let set = AffixSet::new(AffixLimits::new(0, 0));
        set.add(instance("base_armor", AffixCategory::Implicit, None, 1.0))
            .unwrap();
        set.add(instance("glow", AffixCategory::Enchantment, None, 1.0))
            .unwrap();
        assert!(set.has_room(AffixCategory::Implicit));
        assert!(!set.has_room(AffixCategory::Prefix));
    }

    #[test]
    fn group_conflict_and_release() {
        let set = AffixSet::default();
        set.add(instance("sturdy", AffixCategory::Prefix, Some("armor"), 1.0))
            .unwrap();
        let err = set
            .add(instance("reinforced", AffixCategory::Suffix, Some("armor"), 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            AffixError::GroupOccupied {
                group: "armor".into(),
                holder: "sturdy".into()
            }
        );
        assert!(set.has_group("armor"));

        set.remove("sturdy").unwrap();
        assert!(!set.has_group("armor"));
        set.add(instance("reinforced", AffixCategory::Suffix, Some("armor"), 1.0))
            .unwrap();
    }

    #[test]
    fn duplicate_and_missing_ids() {
        let set = AffixSet::default();
        set.add(instance("a", AffixCategory::Prefix, None, 1.0)).unwrap();
        assert_eq!(
            set.add(instance("a", AffixCategory::Prefix, None, 2.0)),
            Err(AffixError::AlreadyPresent("a".into()))
        );
        assert_eq!(
            set.remove("zzz").unwrap_err(),
            AffixError::NotPresent("zzz".into())
        );
    }

    #[test]
    fn need_more_tracks_minimums() {
        let set = AffixSet::new(AffixLimits::new(3, 3).with_minimums(1, 2));
        assert!(set.need_more(AffixCategory::Prefix));
        assert!(set.need_more(AffixCategory::Suffix));
        assert!(!set.need_more(AffixCategory::Implicit));

        set.add(instance("p", AffixCategory::Prefix, None, 1.0)).unwrap();
        set.add(instance("s1", AffixCategory::Suffix, None, 1.0)).unwrap();
        assert!(!set.need_more(AffixCategory::Prefix));
        assert!(set.need_more(AffixCategory::Suffix));

        set.add(instance("s2", AffixCategory::Suffix, None, 1.0)).unwrap();
        assert!(!set.need_more(AffixCategory::Suffix));
    }

    #[test]
    fn all_modifiers_flattens_instances() {
        let set = AffixSet::default();
        set.add(instance("a", AffixCategory::Prefix, None, 3.0)).unwrap();
        set.add(instance("bb", AffixCategory::Suffix, None, 4.0)).unwrap();
        let modifiers = set.all_modifiers();
        assert_eq!(modifiers.len(), 2);
        assert_eq!(modifiers[0].modifier.source, "a");
        assert_eq!(modifiers[1].modifier.value, 4.0);
    }

    #[test]
    fn total_quality_is_mean_of_instances() {
        let set = AffixSet::default();
        assert_eq!(set.total_quality(), 0.0);
        set.add(instance("lo", AffixCategory::Prefix, None, 0.0)).unwrap();
        set.add(instance("hi", AffixCategory::Suffix, None, 10.0)).unwrap();
        assert_eq!(set.total_quality(), 0.5);
    }

    #[test]
    fn used_groups_and_ids() {
        let set = AffixSet::default();
        set.add(instance("a", AffixCategory::Prefix, Some("g1"), 1.0))
            .unwrap();
        set.add(instance("b", AffixCategory::Suffix, None, 1.0)).unwrap();
        assert_eq!(set.used_groups(), BTreeSet::from(["g1".to_owned()]));
        assert_eq!(
            set.used_ids(),
            BTreeSet::from(["a".to_owned(), "b".to_owned()])
        );

        let removed = set.clear();
        assert_eq!(removed.len(), 2);
        assert!(set.is_empty());
    }
}
