//! Procedural item affixes.
//!
//! ```text
//! [ Registry ]      every validated AffixTemplate, by id
//!      ↓ pool()
//! [ AffixPool ]     eligibility filter + weighted roll
//!      ↓ roll()
//! [ AffixInstance ] template + rolled values
//!      ↓ add()
//! [ AffixSet ]      per-item placement rules (groups, caps, minimums)
//!      ↓ all_modifiers()
//! [ AttributeModifier ] → stats::AttributeManager
//! ```
//!
//! [`Generator`] drives the pool and set together for whole items.

pub mod error;
pub mod generator;
pub mod instance;
pub mod pool;
pub mod registry;
pub mod requirements;
pub mod roll;
pub mod set;
pub mod template;
pub mod weight;

pub use error::AffixError;
pub use generator::Generator;
pub use instance::{AffixInstance, InstanceId, InstanceRecord, RolledModifier};
pub use pool::{AffixPool, FilterCriteria, RollContext};
pub use registry::Registry;
pub use requirements::Requirements;
pub use set::AffixSet;
pub use template::{AffixCategory, AffixTemplate, ModifierTemplate};
pub use weight::effective_weight;
