//! Serializable summary of a simulation run.

use std::collections::BTreeMap;
use std::fmt;

use power_core::{AffixInstance, AffixSet, AttributeSnapshot, ItemRarity, ItemType};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct AffixReport {
    pub id: String,
    pub name: String,
    pub category: String,
    pub rank: u8,
    pub values: Vec<f64>,
    pub quality: f64,
    pub text: String,
}

impl From<&AffixInstance> for AffixReport {
    fn from(instance: &AffixInstance) -> Self {
        let template = instance.template();
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            category: instance.category().to_string(),
            rank: template.rank,
            values: instance.values(),
            quality: instance.quality(),
            text: instance.describe(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ItemReport {
    pub item_type: ItemType,
    pub item_level: u32,
    pub rarity: ItemRarity,
    pub quality: f64,
    pub affixes: Vec<AffixReport>,
}

impl ItemReport {
    pub fn new(item_type: ItemType, item_level: u32, rarity: ItemRarity, set: &AffixSet) -> Self {
        Self {
            item_type,
            item_level,
            rarity,
            quality: set.total_quality(),
            affixes: set.instances().iter().map(AffixReport::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SimReport {
    pub seed: u64,
    pub items: Vec<ItemReport>,
    /// Attribute values before anything was equipped.
    pub before: BTreeMap<String, f64>,
    /// Attribute values with every item equipped.
    pub after: BTreeMap<String, f64>,
}

impl SimReport {
    pub fn new(
        seed: u64,
        items: Vec<ItemReport>,
        before: &AttributeSnapshot,
        after: &AttributeSnapshot,
    ) -> Self {
        Self {
            seed,
            items,
            before: keyed(before),
            after: keyed(after),
        }
    }
}

fn keyed(snapshot: &AttributeSnapshot) -> BTreeMap<String, f64> {
    snapshot
        .iter()
        .map(|(attribute, value)| (attribute.to_string(), *value))
        .collect()
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed {}", self.seed)?;
        for (index, item) in self.items.iter().enumerate() {
            writeln!(
                f,
                "\n#{} {} {} (ilvl {}, quality {:.0}%)",
                index + 1,
                item.rarity,
                item.item_type,
                item.item_level,
                item.quality * 100.0
            )?;
            for affix in &item.affixes {
                writeln!(
                    f,
                    "  [{:<6}] {:<24} r{:<3} {}",
                    affix.category, affix.name, affix.rank, affix.text
                )?;
            }
        }

        writeln!(f, "\nattributes")?;
        for (attribute, after) in &self.after {
            let before = self.before.get(attribute).copied().unwrap_or(0.0);
            if before == *after {
                writeln!(f, "  {attribute:<20} {after:>9.1}")?;
            } else {
                writeln!(f, "  {attribute:<20} {after:>9.1}  ({:+.1})", after - before)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use power_core::{
        AffixCategory, AffixTemplate, AttributeKind, ModifierKind, ModifierTemplate,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn sample_set() -> AffixSet {
        let template = AffixTemplate::new("sturdy", "Sturdy", AffixCategory::Prefix)
            .with_rank(5)
            .with_description("+{0} to Armor")
            .with_modifier(ModifierTemplate::new(
                AttributeKind::Armor,
                ModifierKind::Flat,
                10.0,
                10.0,
            ));
        let set = AffixSet::default();
        let mut rng = StdRng::seed_from_u64(1);
        set.add(AffixInstance::roll(Arc::new(template), &mut rng))
            .unwrap();
        set
    }

    #[test]
    fn item_report_lists_rolled_affixes() {
        let report = ItemReport::new(ItemType::Helmet, 30, ItemRarity::Magic, &sample_set());
        assert_eq!(report.affixes.len(), 1);
        assert_eq!(report.affixes[0].category, "prefix");
        assert_eq!(report.affixes[0].text, "+10 to Armor");
        assert_eq!(report.quality, 1.0);
    }

    #[test]
    fn json_uses_snake_case_keys() {
        let item = ItemReport::new(ItemType::BodyArmor, 30, ItemRarity::Rare, &sample_set());
        let before = AttributeSnapshot::from([(AttributeKind::Armor, 5.0)]);
        let after = AttributeSnapshot::from([(AttributeKind::Armor, 15.0)]);
        let report = SimReport::new(3, vec![item], &before, &after);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["items"][0]["item_type"], "body_armor");
        assert_eq!(json["after"]["armor"], 15.0);

        let text = report.to_string();
        assert!(text.contains("(+10.0)"), "{text}");
    }
}
