//! Character power computation and procedural affix rolling.
//!
//! `power-core` has two halves that meet at [`stats::AttributeModifier`]:
//! the [`affix`] subsystem rolls item modifiers from weighted templates, and
//! [`stats::AttributeManager`] folds those modifiers, base values and
//! formulas into cached live attribute values. Everything is synchronous and
//! I/O free; randomness is always supplied by the caller.
pub mod affix;
pub mod config;
pub mod error;
pub mod item;
pub mod stats;
pub use affix::{
    AffixCategory, AffixError, AffixInstance, AffixPool, AffixSet, AffixTemplate, FilterCriteria,
    Generator, InstanceId, InstanceRecord, ModifierTemplate, Registry, Requirements, RollContext,
    RolledModifier,
};
pub use config::{AffixLimits, CountRange, GeneratorConfig, PowerConfig, WeightingConfig};
pub use error::{ErrorSeverity, PowerError};
pub use item::{ItemRarity, ItemSlot, ItemType};
pub use stats::{
    AttributeKind, AttributeManager, AttributeModifier, AttributeReader, AttributeSnapshot,
    Formula, Modifier, ModifierId, ModifierKind, ModifierSet, StackBreakdown, StatError,
};
