use std::sync::Arc;

use power_core::affix::effective_weight;
use power_core::{
    AffixCategory, AffixLimits, AffixPool, AffixSet, AffixTemplate, AttributeKind,
    AttributeManager, CountRange, Formula, Generator, GeneratorConfig, ItemRarity, ItemType,
    ModifierKind, ModifierTemplate, Registry, Requirements, RollContext, WeightingConfig,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn affix(id: &str, category: AffixCategory, attribute: AttributeKind) -> AffixTemplate {
    AffixTemplate::new(id, id, category).with_modifier(ModifierTemplate::new(
        attribute,
        ModifierKind::Flat,
        1.0,
        10.0,
    ))
}

fn catalog() -> Registry {
    let registry = Registry::new();
    registry
        .register_all([
            affix("heavy", AffixCategory::Prefix, AttributeKind::PhysicalDamage)
                .with_group("phys")
                .with_weight(800),
            affix("brutal", AffixCategory::Prefix, AttributeKind::PhysicalDamage)
                .with_group("phys")
                .with_rank(60)
                .with_weight(200),
            affix("sturdy", AffixCategory::Prefix, AttributeKind::Armor).with_group("armor"),
            affix("healthy", AffixCategory::Prefix, AttributeKind::MaxHealth).with_group("life"),
            affix("of_might", AffixCategory::Suffix, AttributeKind::Strength).with_group("str"),
            affix("of_grace", AffixCategory::Suffix, AttributeKind::Dexterity).with_group("dex"),
            affix("of_the_owl", AffixCategory::Suffix, AttributeKind::Intelligence)
                .with_group("int"),
            affix("of_the_ember", AffixCategory::Suffix, AttributeKind::FireResistance)
                .with_group("fire_res")
                .with_requirements(Requirements::new().with_item_types(&[
                    ItemType::Ring,
                    ItemType::Amulet,
                ])),
        ])
        .unwrap();
    registry
}

#[test]
fn selection_ratio_follows_weights() {
    let pool = AffixPool::from_templates([
        affix("common", AffixCategory::Prefix, AttributeKind::Armor).with_weight(300),
        affix("uncommon", AffixCategory::Prefix, AttributeKind::Evasion).with_weight(100),
    ]);
    let ctx = RollContext::new(1, ItemRarity::Normal);
    let mut rng = StdRng::seed_from_u64(2024);

    let draws = 10_000;
    let common = (0..draws)
        .filter(|_| pool.roll(&ctx, &mut rng).unwrap().id == "common")
        .count();
    let ratio = common as f64 / draws as f64;
    assert!((ratio - 0.75).abs() < 0.02, "ratio {ratio}");
}

#[test]
fn high_rank_on_rare_item_outweighs_low_rank_on_normal_item() {
    let config = WeightingConfig::default();
    let strong = affix("strong", AffixCategory::Prefix, AttributeKind::Armor)
        .with_rank(100)
        .with_weight(1000);
    let weak = affix("weak", AffixCategory::Prefix, AttributeKind::Armor)
        .with_rank(1)
        .with_weight(1000);

    let strong_weight = effective_weight(&strong, ItemRarity::from_tier(5), 40, &config);
    let weak_weight = effective_weight(&weak, ItemRarity::from_tier(0), 40, &config);
    assert!(strong_weight > weak_weight, "{strong_weight} <= {weak_weight}");
}

#[test]
fn generated_sets_never_break_placement_rules() {
    let registry = catalog();
    let generator = Generator::new(
        registry.pool(),
        GeneratorConfig {
            prefixes: CountRange::new(0, 4),
            suffixes: CountRange::new(0, 4),
            limits: AffixLimits::new(2, 3),
        },
    );
    let ctx = RollContext::for_item(ItemType::Sword, 30, ItemRarity::Rare);

    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let set = generator.generate_set(&ctx, &mut rng);
        assert!(set.count(AffixCategory::Prefix) <= 2);
        assert!(set.count(AffixCategory::Suffix) <= 3);
        assert_eq!(set.used_groups().len(), set.len());
        assert!(!set.contains("of_the_ember"), "ring-only affix on a sword");
    }
}

#[test]
fn generation_is_bounded_by_available_groups() {
    let registry = catalog();
    let generator = Generator::new(
        registry.pool(),
        GeneratorConfig {
            prefixes: CountRange::exactly(6),
            suffixes: CountRange::exactly(6),
            limits: AffixLimits::new(6, 6),
        },
    );
    let ctx = RollContext::for_item(ItemType::Sword, 30, ItemRarity::Rare);
    let instances = generator.generate(&ctx, &mut StdRng::seed_from_u64(1));

    // phys, armor, life prefixes; str, dex, int suffixes (ember needs jewellery)
    assert_eq!(instances.len(), 6);
}

#[test]
fn populated_set_feeds_attribute_manager() {
    let registry = catalog();
    let generator = Generator::from_registry(&registry, &Default::default());
    let set = AffixSet::new(AffixLimits::new(3, 3).with_minimums(3, 3));
    let ctx = RollContext::for_item(ItemType::Amulet, 60, ItemRarity::Legendary);
    let mut rng = StdRng::seed_from_u64(31);

    let added = generator.populate_set(&set, &ctx, &mut rng).unwrap();
    assert_eq!(added, 6);

    let hero = AttributeManager::with_bases([
        (AttributeKind::Strength, 10.0),
        (AttributeKind::Vitality, 10.0),
    ]);
    hero.set_formula(
        AttributeKind::PhysicalDamage,
        Formula::multiply(AttributeKind::Strength, 2.0),
    )
    .unwrap();
    let before = hero.snapshot();

    let modifiers = set.all_modifiers();
    hero.apply_modifiers(&modifiers);
    if let Some(might) = set.get("of_might") {
        let expected = 10.0 + might.values()[0];
        assert_eq!(hero.get(AttributeKind::Strength), expected);
        assert_eq!(hero.get(AttributeKind::PhysicalDamage), expected * 2.0);
    }

    assert_eq!(hero.retract_modifiers(&modifiers), modifiers.len());
    assert_eq!(hero.snapshot(), before);
}

#[test]
fn rerolling_an_item_keeps_it_valid() {
    let registry = catalog();
    let generator = Generator::from_registry(&registry, &Default::default())
        .with_config(GeneratorConfig::for_rarity(ItemRarity::Epic));
    let ctx = RollContext::for_item(ItemType::Ring, 45, ItemRarity::Epic);
    let mut rng = StdRng::seed_from_u64(5);

    let set = generator.generate_set(&ctx, &mut rng);
    for _ in 0..25 {
        generator.reroll_set(&set, &ctx, &mut rng).unwrap();
        assert!(!set.need_more(AffixCategory::Prefix));
        assert!(!set.need_more(AffixCategory::Suffix));
        assert_eq!(set.used_groups().len(), set.len());
    }

    set.reroll_all(&mut rng);
    let quality = set.total_quality();
    assert!((0.0..=1.0).contains(&quality));
}

#[test]
fn persisted_instances_restore_through_registry() {
    let registry = catalog();
    let template = registry.get("sturdy").unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let original = power_core::AffixInstance::roll(Arc::clone(&template), &mut rng);

    let restored = registry.restore_instance(&original.to_record()).unwrap();
    assert_eq!(restored, original);
    assert_eq!(restored.modifiers(), original.modifiers());
}
