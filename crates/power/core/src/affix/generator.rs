//! Affix generation for whole items.
//!
//! Two modes:
//! - [`Generator::generate`] is best-effort: it draws prefix/suffix counts
//!   and rolls until each category is done or its candidates run out.
//! - [`Generator::add_affix`] / [`Generator::populate_set`] are completion
//!   driven: running out of candidates is an error, because the caller asked
//!   for a minimum.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::error::AffixError;
use super::instance::AffixInstance;
use super::pool::{AffixPool, RollContext};
use super::registry::Registry;
use super::set::AffixSet;
use super::template::AffixCategory;
use crate::config::{GeneratorConfig, PowerConfig};

#[derive(Clone, Debug, Default)]
pub struct Generator {
    pool: AffixPool,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(pool: AffixPool, config: GeneratorConfig) -> Self {
        Self { pool, config }
    }

    /// A generator over every template in `registry`.
    pub fn from_registry(registry: &Registry, config: &PowerConfig) -> Self {
        let pool = registry.pool_with(config.weighting.clone(), &Default::default());
        Self::new(pool, config.generator)
    }

    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pool(&self) -> &AffixPool {
        &self.pool
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Roll a full set of affixes for an item.
    ///
    /// Prefix and suffix counts are drawn from the configured ranges. Each
    /// placed template's id and group are excluded from later rolls in the
    /// same call. Running out of candidates ends that category early without
    /// error; `ctx.category` is ignored.
    pub fn generate<R: Rng + ?Sized>(&self, ctx: &RollContext, rng: &mut R) -> Vec<AffixInstance> {
        let mut ctx = ctx.clone();
        let prefixes = self.config.prefixes.roll(rng);
        let suffixes = self.config.suffixes.roll(rng);
        // Counts come from content config and may far exceed what the pool holds
        let requested = (prefixes as usize).saturating_add(suffixes as usize);
        let mut instances = Vec::with_capacity(requested.min(self.pool.len()));

        for (category, count) in [
            (AffixCategory::Prefix, prefixes),
            (AffixCategory::Suffix, suffixes),
        ] {
            ctx.category = Some(category);
            for rolled in 0..count {
                match self.pool.roll(&ctx, rng) {
                    Ok(template) => {
                        ctx.exclude_template(&template);
                        instances.push(AffixInstance::roll(template, rng));
                    }
                    Err(err) => {
                        debug!(%category, requested = count, rolled, %err, "affix candidates exhausted");
                        break;
                    }
                }
            }
        }

        debug!(
            prefixes,
            suffixes,
            produced = instances.len(),
            item_level = ctx.item_level,
            rarity = %ctx.rarity,
            "generated affixes"
        );
        instances
    }

    /// [`generate`](Self::generate) straight into a fresh set with the
    /// configured limits.
    pub fn generate_set<R: Rng + ?Sized>(&self, ctx: &RollContext, rng: &mut R) -> AffixSet {
        let set = AffixSet::new(self.config.limits);
        self.place(&set, self.generate(ctx, rng));
        set
    }

    fn place(&self, set: &AffixSet, instances: Vec<AffixInstance>) -> usize {
        let mut placed = 0;
        for instance in instances {
            match set.add(instance) {
                Ok(()) => placed += 1,
                Err(err) => debug!(%err, "generated affix did not fit"),
            }
        }
        placed
    }

    /// Roll one affix into `set`.
    ///
    /// Exclusions are derived from the set's contents. When `ctx.category`
    /// is unset the category is chosen: one below its minimum first,
    /// otherwise any capped category with room.
    pub fn add_affix<R: Rng + ?Sized>(
        &self,
        set: &AffixSet,
        ctx: &RollContext,
        rng: &mut R,
    ) -> Result<AffixInstance, AffixError> {
        let category = match ctx.category {
            Some(category) => category,
            None => choose_category(set, rng)?,
        };
        if let Some(limit) = set.max_of(category)
            && !set.has_room(category)
        {
            return Err(AffixError::CategoryFull { category, limit });
        }

        let mut ctx = ctx.clone();
        ctx.category = Some(category);
        ctx.exclude_groups.extend(set.used_groups());
        ctx.exclude_ids.extend(set.used_ids());

        let template = self.pool.roll(&ctx, rng)?;
        let instance = AffixInstance::roll(template, rng);
        set.add(instance.clone())?;
        Ok(instance)
    }

    /// Add affixes until neither prefixes nor suffixes are below their
    /// minimum. Returns how many were added.
    pub fn populate_set<R: Rng + ?Sized>(
        &self,
        set: &AffixSet,
        ctx: &RollContext,
        rng: &mut R,
    ) -> Result<usize, AffixError> {
        let open = RollContext {
            category: None,
            ..ctx.clone()
        };
        let mut added = 0;
        while AffixCategory::CAPPED.iter().any(|c| set.need_more(*c)) {
            self.add_affix(set, &open, rng)?;
            added += 1;
        }
        Ok(added)
    }

    /// Clear `set`, roll a fresh best-effort selection into it, then top it
    /// up to its minimums. Returns the new affix count.
    pub fn reroll_set<R: Rng + ?Sized>(
        &self,
        set: &AffixSet,
        ctx: &RollContext,
        rng: &mut R,
    ) -> Result<usize, AffixError> {
        set.clear();
        let placed = self.place(set, self.generate(ctx, rng));
        let added = self.populate_set(set, ctx, rng)?;
        Ok(placed + added)
    }
}

fn choose_category<R: Rng + ?Sized>(
    set: &AffixSet,
    rng: &mut R,
) -> Result<AffixCategory, AffixError> {
    let below_minimum: Vec<AffixCategory> = AffixCategory::CAPPED
        .into_iter()
        .filter(|c| set.need_more(*c) && set.has_room(*c))
        .collect();
    if let Some(category) = below_minimum.choose(rng) {
        return Ok(*category);
    }

    let with_room: Vec<AffixCategory> = AffixCategory::CAPPED
        .into_iter()
        .filter(|c| set.has_room(*c))
        .collect();
    with_room.choose(rng).copied().ok_or(AffixError::SetFull)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affix::template::{AffixTemplate, ModifierTemplate};
    use crate::config::{AffixLimits, CountRange};
    use crate::item::ItemRarity;
    use crate::stats::{AttributeKind, ModifierKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn template(id: &str, category: AffixCategory, group: &str) -> AffixTemplate {
        AffixTemplate::new(id, id, category)
            .with_group(group)
            .with_modifier(ModifierTemplate::new(
                AttributeKind::Strength,
                ModifierKind::Flat,
                1.0,
                10.0,
            ))
    }

    fn pool() -> AffixPool {
        AffixPool::from_templates([
            template("p1", AffixCategory::Prefix, "g1"),
            template("p2", AffixCategory::Prefix, "g2"),
            template("p3", AffixCategory::Prefix, "g3"),
            template("p3b", AffixCategory::Prefix, "g3"),
            template("s1", AffixCategory::Suffix, "h1"),
            template("s2", AffixCategory::Suffix, "h2"),
            template("s3", AffixCategory::Suffix, "h3"),
        ])
    }

    fn exact(prefixes: u32, suffixes: u32) -> GeneratorConfig {
        GeneratorConfig {
            prefixes: CountRange::exactly(prefixes),
            suffixes: CountRange::exactly(suffixes),
            limits: AffixLimits::new(3, 3),
        }
    }

    fn ctx() -> RollContext {
        RollContext::new(10, ItemRarity::Rare)
    }

    #[test]
    fn generate_respects_groups_and_counts() {
        let generator = Generator::new(pool(), exact(3, 2));
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let instances = generator.generate(&ctx(), &mut rng);
            let prefixes = instances
                .iter()
                .filter(|i| i.category() == AffixCategory::Prefix)
                .count();
            assert_eq!(prefixes, 3);
            assert_eq!(instances.len(), 5);

            let mut groups: Vec<_> = instances.iter().filter_map(|i| i.group()).collect();
            groups.sort_unstable();
            groups.dedup();
            assert_eq!(groups.len(), 5);
        }
    }

    #[test]
    fn generate_stops_quietly_when_a_category_runs_dry() {
        let pool = AffixPool::from_templates([
            template("only_prefix", AffixCategory::Prefix, "g"),
            template("s1", AffixCategory::Suffix, "h1"),
            template("s2", AffixCategory::Suffix, "h2"),
        ]);
        let generator = Generator::new(pool, exact(3, 2));
        let instances = generator.generate(&ctx(), &mut StdRng::seed_from_u64(2));
        assert_eq!(instances.len(), 3);
        assert_eq!(
            instances
                .iter()
                .filter(|i| i.category() == AffixCategory::Suffix)
                .count(),
            2
        );
    }

    #[test]
    fn huge_configured_counts_stop_at_pool_exhaustion() {
        let generator = Generator::new(pool(), exact(u32::MAX, 1));
        let mut rng = StdRng::seed_from_u64(9);

        let instances = generator.generate(&ctx(), &mut rng);
        let prefixes = instances
            .iter()
            .filter(|i| i.category() == AffixCategory::Prefix)
            .count();
        assert_eq!(prefixes, 3);
        assert_eq!(instances.len(), 4);

        let set = generator.generate_set(&ctx(), &mut rng);
        assert_eq!(set.count(AffixCategory::Prefix), 3);
        assert_eq!(set.count(AffixCategory::Suffix), 1);
    }

    #[test]
    fn generate_set_fills_a_set_with_configured_limits() {
        let generator = Generator::new(pool(), exact(2, 1));
        let set = generator.generate_set(&ctx(), &mut StdRng::seed_from_u64(3));
        assert_eq!(set.len(), 3);
        assert_eq!(set.limits(), AffixLimits::new(3, 3));
    }

    #[test]
    fn add_affix_respects_existing_contents() {
        let generator = Generator::new(pool(), exact(0, 0));
        let set = AffixSet::new(AffixLimits::new(3, 3));
        let mut rng = StdRng::seed_from_u64(4);
        let prefix_ctx = ctx().with_category(AffixCategory::Prefix);

        for _ in 0..3 {
            generator.add_affix(&set, &prefix_ctx, &mut rng).unwrap();
        }
        assert_eq!(set.count(AffixCategory::Prefix), 3);
        let err = generator.add_affix(&set, &prefix_ctx, &mut rng).unwrap_err();
        assert_eq!(
            err,
            AffixError::CategoryFull {
                category: AffixCategory::Prefix,
                limit: 3
            }
        );
    }

    #[test]
    fn add_affix_propagates_exhaustion() {
        let pool = AffixPool::from_templates([template("p1", AffixCategory::Prefix, "g1")]);
        let generator = Generator::new(pool, exact(0, 0));
        let set = AffixSet::new(AffixLimits::new(3, 3));
        let mut rng = StdRng::seed_from_u64(5);
        let prefix_ctx = ctx().with_category(AffixCategory::Prefix);

        generator.add_affix(&set, &prefix_ctx, &mut rng).unwrap();
        let err = generator.add_affix(&set, &prefix_ctx, &mut rng).unwrap_err();
        assert!(err.is_exhaustion());
    }

    #[test]
    fn add_affix_reports_a_full_set() {
        let generator = Generator::new(pool(), exact(0, 0));
        let set = AffixSet::new(AffixLimits::new(0, 0));
        let err = generator
            .add_affix(&set, &ctx(), &mut StdRng::seed_from_u64(6))
            .unwrap_err();
        assert_eq!(err, AffixError::SetFull);
    }

    #[test]
    fn open_category_prefers_unmet_minimum() {
        let generator = Generator::new(pool(), exact(0, 0));
        let set = AffixSet::new(AffixLimits::new(3, 3).with_minimums(0, 1));
        let added = generator
            .add_affix(&set, &ctx(), &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(added.category(), AffixCategory::Suffix);
    }

    #[test]
    fn populate_set_meets_minimums() {
        let generator = Generator::new(pool(), exact(0, 0));
        let set = AffixSet::new(AffixLimits::new(3, 3).with_minimums(2, 3));
        let added = generator
            .populate_set(&set, &ctx(), &mut StdRng::seed_from_u64(8))
            .unwrap();
        assert_eq!(added, 5);
        assert!(!set.need_more(AffixCategory::Prefix));
        assert!(!set.need_more(AffixCategory::Suffix));
    }

    #[test]
    fn populate_set_fails_when_minimum_is_unreachable() {
        let pool = AffixPool::from_templates([template("s1", AffixCategory::Suffix, "h1")]);
        let generator = Generator::new(pool, exact(0, 0));
        let set = AffixSet::new(AffixLimits::new(3, 3).with_minimums(0, 2));
        let err = generator
            .populate_set(&set, &ctx(), &mut StdRng::seed_from_u64(9))
            .unwrap_err();
        assert!(err.is_exhaustion());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn reroll_set_replaces_contents() {
        let generator = Generator::new(pool(), exact(1, 1));
        let set = AffixSet::new(AffixLimits::new(3, 3).with_minimums(2, 0));
        let mut rng = StdRng::seed_from_u64(10);
        generator.populate_set(&set, &ctx(), &mut rng).unwrap();
        let before: Vec<_> = set.instances().iter().map(AffixInstance::id).collect();

        let count = generator.reroll_set(&set, &ctx(), &mut rng).unwrap();
        assert_eq!(count, set.len());
        assert!(set.count(AffixCategory::Prefix) >= 2);
        let after: Vec<_> = set.instances().iter().map(AffixInstance::id).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let generator = Generator::new(pool(), GeneratorConfig::for_rarity(ItemRarity::Rare));
        let a = generator.generate(&ctx(), &mut StdRng::seed_from_u64(77));
        let b = generator.generate(&ctx(), &mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }
}
