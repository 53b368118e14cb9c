use std::fs;
use std::path::PathBuf;

use power_content::{AffixLoader, ContentFactory, DerivedRules, LoadMode};
use power_core::{
    AffixCategory, AttributeKind, AttributeManager, GeneratorConfig, ItemRarity, ItemType,
    PowerConfig, Registry, RollContext,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data")
}

#[test]
fn bundled_catalog_loads_strictly() {
    let registry = ContentFactory::new(data_dir()).load_registry().unwrap();
    assert!(registry.len() >= 20);
    assert!(!registry.by_category(AffixCategory::Prefix).is_empty());
    assert!(!registry.by_category(AffixCategory::Suffix).is_empty());
    for template in registry.all() {
        assert_eq!(template.validate(), Ok(()), "{}", template.id);
    }
}

#[test]
fn bundled_config_matches_defaults() {
    let config = ContentFactory::new(data_dir()).load_config().unwrap();
    assert_eq!(config.weighting, PowerConfig::default().weighting);
    assert_eq!(
        config.generator,
        GeneratorConfig::for_rarity(ItemRarity::Rare)
    );
}

#[test]
fn bundled_rules_match_standard_rules() {
    let rules = ContentFactory::new(data_dir()).load_rules().unwrap();
    assert_eq!(rules, DerivedRules::standard());
}

#[test]
fn bundled_affixes_do_not_target_derived_attributes() {
    let factory = ContentFactory::new(data_dir());
    let rules = factory.load_rules().unwrap();
    let registry = factory.load_registry().unwrap();
    for template in registry.all() {
        for modifier in &template.modifiers {
            assert!(
                rules.get(modifier.attribute).is_none(),
                "{} targets derived attribute {}",
                template.id,
                modifier.attribute
            );
        }
    }
}

#[test]
fn generated_items_equip_onto_a_character() {
    let factory = ContentFactory::new(data_dir());
    let (_registry, generator) = factory.load_generator().unwrap();
    let generator = generator.with_config(GeneratorConfig::for_rarity(ItemRarity::Legendary));

    let hero = AttributeManager::with_bases([
        (AttributeKind::Strength, 10.0),
        (AttributeKind::Vitality, 10.0),
    ]);
    factory.load_rules().unwrap().install(&hero).unwrap();
    let life_before = hero.get(AttributeKind::MaxHealth);

    let ctx = RollContext::for_item(ItemType::BodyArmor, 70, ItemRarity::Legendary);
    let mut rng = StdRng::seed_from_u64(12);
    let set = generator.generate_set(&ctx, &mut rng);
    assert!(!set.is_empty());

    let modifiers = set.all_modifiers();
    hero.apply_modifiers(&modifiers);
    let strength = hero.get(AttributeKind::Strength);
    let vitality = hero.get(AttributeKind::Vitality);
    assert_eq!(
        hero.get(AttributeKind::MaxHealth),
        50.0 + vitality * 10.0 + strength * 2.0
    );

    hero.retract_modifiers(&modifiers);
    assert_eq!(hero.get(AttributeKind::MaxHealth), life_before);
}

#[test]
fn lenient_load_skips_bad_entries_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("affixes.ron");
    fs::write(
        &path,
        r#"(
            affixes: [
                (
                    id: "good",
                    name: "Good",
                    type: suffix,
                    rank: 10,
                    weight: 100,
                    modifiers: [(attribute: evasion, mod_type: flat, min: 1.0, max: 3.0)],
                ),
                (
                    id: "inverted",
                    name: "Inverted",
                    type: suffix,
                    rank: 10,
                    weight: 100,
                    modifiers: [(attribute: evasion, mod_type: flat, min: 9.0, max: 3.0)],
                ),
                (
                    id: "good",
                    name: "Good Again",
                    type: prefix,
                    rank: 10,
                    weight: 100,
                    modifiers: [(attribute: armor, mod_type: flat, min: 1.0, max: 3.0)],
                ),
            ],
        )"#,
    )
    .unwrap();

    assert!(AffixLoader::load(&path).is_err());

    let registry = Registry::new();
    let registered = AffixLoader::load_into(&path, &registry, LoadMode::Lenient).unwrap();
    assert_eq!(registered, 1);
    assert_eq!(
        registry.get("good").map(|t| t.category),
        Some(AffixCategory::Suffix)
    );

    let strict = Registry::new();
    let err = AffixLoader::load_into(&path, &strict, LoadMode::Strict).unwrap_err();
    assert!(err.to_string().contains("inverted"), "{err}");
}

#[test]
fn lenient_factory_tolerates_bad_entries() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(ContentFactory::AFFIX_FILE),
        r#"(affixes: [(id: "", name: "Nameless", type: prefix, rank: 1, weight: 1, modifiers: [])])"#,
    )
    .unwrap();

    assert!(ContentFactory::new(dir.path()).load_registry().is_err());
    let registry = ContentFactory::new(dir.path())
        .lenient()
        .load_registry()
        .unwrap();
    assert!(registry.is_empty());
}

#[test]
fn unreadable_config_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ContentFactory::CONFIG_FILE), "[generator\n").unwrap();
    let err = ContentFactory::new(dir.path()).load_config().unwrap_err();
    assert!(err.to_string().contains("config.toml"), "{err}");
}
