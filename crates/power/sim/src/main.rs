//! Rolls a batch of items from the bundled content and equips them on a
//! sample character.
mod config;
mod report;

use anyhow::{Context, Result};
use power_content::ContentFactory;
use power_core::{
    AffixSet, AttributeKind, AttributeManager, AttributeSnapshot, Generator, GeneratorConfig,
    ItemType, PowerError, RollContext,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use strum::IntoEnumIterator;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::SimConfig;
use crate::report::{ItemReport, SimReport};

const HERO_BASES: [(AttributeKind, f64); 8] = [
    (AttributeKind::Strength, 12.0),
    (AttributeKind::Dexterity, 10.0),
    (AttributeKind::Intelligence, 8.0),
    (AttributeKind::Vitality, 11.0),
    (AttributeKind::Armor, 20.0),
    (AttributeKind::Evasion, 15.0),
    (AttributeKind::PhysicalDamage, 6.0),
    (AttributeKind::AttackSpeed, 1.0),
];

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = SimConfig::from_env();
    tracing::info!(
        data_dir = %config.data_dir.display(),
        seed = config.seed,
        items = config.items,
        rarity = %config.rarity,
        "starting power simulation"
    );

    let factory = ContentFactory::new(&config.data_dir);
    let (registry, generator) = factory
        .load_generator()
        .context("failed to load affix content")?;
    let rules = factory.load_rules().context("failed to load derived rules")?;
    let generator = generator.with_config(GeneratorConfig::for_rarity(config.rarity));
    tracing::info!(affixes = registry.len(), rules = rules.len(), "content loaded");

    let hero = AttributeManager::with_bases(HERO_BASES);
    rules
        .install(&hero)
        .context("derived rules form a cycle")?;
    let before = sheet(&hero);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let item_types: Vec<ItemType> = ItemType::iter().collect();

    let mut items = Vec::with_capacity(config.items);
    for _ in 0..config.items {
        let item_type = match config.item_type {
            Some(item_type) => item_type,
            None => *item_types
                .choose(&mut rng)
                .context("no item types to roll")?,
        };
        let ctx = RollContext::for_item(item_type, config.item_level, config.rarity);
        let set = roll_item(&generator, &ctx, &mut rng);

        hero.apply_modifiers(&set.all_modifiers());
        items.push(ItemReport::new(
            item_type,
            config.item_level,
            config.rarity,
            &set,
        ));
    }

    let report = SimReport::new(config.seed, items, &before, &sheet(&hero));
    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Generate a best-effort set, then try to reach the configured minimums.
fn roll_item(generator: &Generator, ctx: &RollContext, rng: &mut StdRng) -> AffixSet {
    let set = generator.generate_set(ctx, rng);
    if let Err(err) = generator.populate_set(&set, ctx, rng) {
        let severity = err.severity();
        if severity.is_recoverable() {
            tracing::warn!(
                item_type = ?ctx.item_type,
                code = err.error_code(),
                %err,
                "item left below its affix minimum"
            );
        } else {
            tracing::error!(
                item_type = ?ctx.item_type,
                code = err.error_code(),
                severity = severity.as_str(),
                %err,
                "affix population failed"
            );
        }
    }
    tracing::debug!(item_type = ?ctx.item_type, affixes = set.len(), "item rolled");
    set
}

/// Current value of every attribute the hero has, including ones that only
/// carry modifiers.
fn sheet(hero: &AttributeManager) -> AttributeSnapshot {
    hero.attributes()
        .into_iter()
        .map(|attribute| (attribute, hero.get(attribute)))
        .collect()
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    // Logs go to stderr so stdout stays a clean report
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
