//! Weighted affix selection.
//!
//! A pool holds shared templates and rolls one of them per call:
//!
//! 1. filter to templates eligible for the [`RollContext`]
//! 2. compute each candidate's [`effective_weight`]
//! 3. draw an integer in `[0, total)` and walk the cumulative weights
//!
//! [`AffixPool::filter`] offers deterministic, criteria-based listing for
//! inspection tools.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;

use super::error::AffixError;
use super::template::{AffixCategory, AffixTemplate};
use super::weight::effective_weight;
use crate::config::WeightingConfig;
use crate::item::{ItemRarity, ItemSlot, ItemType};

/// The item being rolled for, plus exclusions accumulated during generation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollContext {
    /// Restrict to one category; `None` accepts any.
    pub category: Option<AffixCategory>,
    pub item_type: Option<ItemType>,
    pub slot: Option<ItemSlot>,
    pub item_level: u32,
    pub rarity: ItemRarity,
    pub exclude_groups: BTreeSet<String>,
    pub exclude_ids: BTreeSet<String>,
    /// Every tag listed here must be present.
    pub require_tags: Vec<String>,
    /// None of the tags listed here may be present.
    pub exclude_tags: Vec<String>,
}

impl RollContext {
    pub fn new(item_level: u32, rarity: ItemRarity) -> Self {
        Self {
            item_level,
            rarity,
            ..Self::default()
        }
    }

    /// Context for an item type, using its default slot.
    pub fn for_item(item_type: ItemType, item_level: u32, rarity: ItemRarity) -> Self {
        Self {
            item_type: Some(item_type),
            slot: Some(item_type.default_slot()),
            ..Self::new(item_level, rarity)
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: AffixCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_slot(mut self, slot: ItemSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    #[must_use]
    pub fn excluding_group(mut self, group: impl Into<String>) -> Self {
        self.exclude_groups.insert(group.into());
        self
    }

    #[must_use]
    pub fn excluding_id(mut self, id: impl Into<String>) -> Self {
        self.exclude_ids.insert(id.into());
        self
    }

    #[must_use]
    pub fn requiring_tag(mut self, tag: impl Into<String>) -> Self {
        self.require_tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn excluding_tag(mut self, tag: impl Into<String>) -> Self {
        self.exclude_tags.push(tag.into());
        self
    }

    /// Record a placed template so later rolls skip its id and group.
    pub fn exclude_template(&mut self, template: &AffixTemplate) {
        self.exclude_ids.insert(template.id.clone());
        if let Some(group) = template.group() {
            self.exclude_groups.insert(group.to_owned());
        }
    }

    pub fn is_eligible(&self, template: &AffixTemplate) -> bool {
        if self.category.is_some_and(|c| c != template.category) {
            return false;
        }
        if template
            .group()
            .is_some_and(|group| self.exclude_groups.contains(group))
        {
            return false;
        }
        if self.exclude_ids.contains(&template.id) {
            return false;
        }
        if !self.require_tags.iter().all(|tag| template.has_tag(tag)) {
            return false;
        }
        if self.exclude_tags.iter().any(|tag| template.has_tag(tag)) {
            return false;
        }
        template
            .requirements
            .as_ref()
            .is_none_or(|req| req.check(self.item_type, self.item_level, self.slot))
    }
}

/// Deterministic matching for listing and pool construction.
///
/// Unset fields accept anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: Option<AffixCategory>,
    pub group: Option<String>,
    /// Every tag must be present.
    pub tags_all: Vec<String>,
    /// At least one tag must be present (ignored when empty).
    pub tags_any: Vec<String>,
    pub rank: Option<RangeInclusive<u8>>,
    /// Keep only templates whose level requirements admit this item level.
    pub item_level: Option<u32>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(mut self, category: AffixCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn tags_all(mut self, tags: &[&str]) -> Self {
        self.tags_all = tags.iter().map(|t| (*t).to_owned()).collect();
        self
    }

    #[must_use]
    pub fn tags_any(mut self, tags: &[&str]) -> Self {
        self.tags_any = tags.iter().map(|t| (*t).to_owned()).collect();
        self
    }

    #[must_use]
    pub fn rank(mut self, rank: RangeInclusive<u8>) -> Self {
        self.rank = Some(rank);
        self
    }

    #[must_use]
    pub fn item_level(mut self, item_level: u32) -> Self {
        self.item_level = Some(item_level);
        self
    }

    pub fn matches(&self, template: &AffixTemplate) -> bool {
        if self.category.is_some_and(|c| c != template.category) {
            return false;
        }
        if let Some(group) = &self.group
            && template.group() != Some(group.as_str())
        {
            return false;
        }
        if !self.tags_all.iter().all(|tag| template.has_tag(tag)) {
            return false;
        }
        if !self.tags_any.is_empty() && !self.tags_any.iter().any(|tag| template.has_tag(tag)) {
            return false;
        }
        if let Some(rank) = &self.rank
            && !rank.contains(&template.rank)
        {
            return false;
        }
        match (self.item_level, &template.requirements) {
            (Some(level), Some(req)) => req.accepts_level(level),
            _ => true,
        }
    }
}

/// A set of templates to roll from.
///
/// Templates are unique by id; adding an existing id replaces it in place.
#[derive(Debug, Default)]
pub struct AffixPool {
    templates: RwLock<Vec<Arc<AffixTemplate>>>,
    weighting: WeightingConfig,
}

impl Clone for AffixPool {
    fn clone(&self) -> Self {
        Self {
            templates: RwLock::new(self.read().clone()),
            weighting: self.weighting.clone(),
        }
    }
}

impl AffixPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weighting(weighting: WeightingConfig) -> Self {
        Self {
            templates: RwLock::default(),
            weighting,
        }
    }

    pub fn from_templates<I, T>(templates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arc<AffixTemplate>>,
    {
        let pool = Self::new();
        for template in templates {
            pool.add(template);
        }
        pool
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<AffixTemplate>>> {
        self.templates.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<AffixTemplate>>> {
        self.templates.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn weighting(&self) -> &WeightingConfig {
        &self.weighting
    }

    /// Add a template, returning the one it replaced.
    pub fn add(&self, template: impl Into<Arc<AffixTemplate>>) -> Option<Arc<AffixTemplate>> {
        let template = template.into();
        let mut templates = self.write();
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(slot) => Some(std::mem::replace(slot, template)),
            None => {
                templates.push(template);
                None
            }
        }
    }

    pub fn remove(&self, id: &str) -> Option<Arc<AffixTemplate>> {
        let mut templates = self.write();
        let index = templates.iter().position(|t| t.id == id)?;
        Some(templates.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<Arc<AffixTemplate>> {
        self.read().iter().find(|t| t.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn templates(&self) -> Vec<Arc<AffixTemplate>> {
        self.read().clone()
    }

    /// Templates eligible for `ctx`, in pool order.
    pub fn eligible(&self, ctx: &RollContext) -> Vec<Arc<AffixTemplate>> {
        self.read()
            .iter()
            .filter(|t| ctx.is_eligible(t))
            .cloned()
            .collect()
    }

    /// Eligible templates paired with their effective weights.
    pub fn weighted_candidates(&self, ctx: &RollContext) -> Vec<(Arc<AffixTemplate>, u64)> {
        self.read()
            .iter()
            .filter(|t| ctx.is_eligible(t))
            .map(|t| {
                let weight = effective_weight(t, ctx.rarity, ctx.item_level, &self.weighting);
                (Arc::clone(t), weight)
            })
            .collect()
    }

    /// Roll one eligible template, weighted by effective weight.
    pub fn roll<R: Rng + ?Sized>(
        &self,
        ctx: &RollContext,
        rng: &mut R,
    ) -> Result<Arc<AffixTemplate>, AffixError> {
        let candidates = self.weighted_candidates(ctx);
        if candidates.is_empty() {
            return Err(AffixError::NoEligibleAffix {
                category: ctx.category,
            });
        }

        let total = candidates
            .iter()
            .fold(0u64, |acc, (_, weight)| acc.saturating_add(*weight));
        if total == 0 {
            return Err(AffixError::NonPositiveWeight {
                candidates: candidates.len(),
            });
        }

        let draw = rng.gen_range(0..total);
        tracing::trace!(
            candidates = candidates.len(),
            total,
            draw,
            "weighted affix draw"
        );

        let mut cumulative = 0u64;
        candidates
            .into_iter()
            .find(|(_, weight)| {
                cumulative = cumulative.saturating_add(*weight);
                cumulative > draw
            })
            .map(|(template, _)| template)
            .ok_or(AffixError::NonPositiveWeight { candidates: 0 })
    }

    /// Templates matching `criteria`, in pool order.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Arc<AffixTemplate>> {
        self.read()
            .iter()
            .filter(|t| criteria.matches(t))
            .cloned()
            .collect()
    }
}
