//! Attribute identity.

/// Key of a character attribute.
///
/// Attributes have no lifecycle of their own; an [`AttributeManager`](super::AttributeManager)
/// stores base values, modifiers and formulas keyed by this enum, and any
/// attribute it has never seen reads as zero.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttributeKind {
    // ===== primary =====
    Strength,
    Dexterity,
    Intelligence,
    Vitality,

    // ===== resources =====
    MaxHealth,
    MaxMana,
    HealthRegen,
    ManaRegen,

    // ===== defence =====
    Armor,
    Evasion,
    BlockChance,
    FireResistance,
    ColdResistance,
    LightningResistance,

    // ===== offence =====
    PhysicalDamage,
    FireDamage,
    ColdDamage,
    LightningDamage,
    AttackSpeed,
    CastSpeed,
    CritChance,
    CritMultiplier,
    Accuracy,

    // ===== utility =====
    MovementSpeed,
    ItemRarity,
    ItemQuantity,
    ExperienceGain,
}

impl AttributeKind {
    /// Returns true for the four primary attributes.
    pub const fn is_primary(&self) -> bool {
        matches!(
            self,
            Self::Strength | Self::Dexterity | Self::Intelligence | Self::Vitality
        )
    }

    /// Returns true for elemental resistances.
    pub const fn is_resistance(&self) -> bool {
        matches!(
            self,
            Self::FireResistance | Self::ColdResistance | Self::LightningResistance
        )
    }
}
