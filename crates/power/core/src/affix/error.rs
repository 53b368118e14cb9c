//! Affix subsystem errors.
//!
//! Two families matter to callers:
//! - **Exhaustion** (`NoEligibleAffix`, `NonPositiveWeight`): nothing can be
//!   rolled for the given context. Full-item generation treats this as a soft
//!   stop; completion-driven workflows propagate it.
//! - **Conflict** (`GroupOccupied`, `CategoryFull`, `AlreadyPresent`, `SetFull`):
//!   the set rejected a placement. Callers retry with another template or
//!   accept the rejection.

use super::template::AffixCategory;
use crate::error::{ErrorSeverity, PowerError};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AffixError {
    /// No template in the pool passes the eligibility filter.
    #[error("no eligible affix{}", category_suffix(.category))]
    NoEligibleAffix { category: Option<AffixCategory> },

    /// Eligible templates exist but their total effective weight is not positive.
    #[error("{candidates} eligible affixes have no positive total weight")]
    NonPositiveWeight { candidates: usize },

    /// Another affix already holds this mutual-exclusion group.
    #[error("group '{group}' is already occupied by '{holder}'")]
    GroupOccupied { group: String, holder: String },

    /// The set already holds its maximum of this category.
    #[error("{category} limit of {limit} reached")]
    CategoryFull { category: AffixCategory, limit: u32 },

    /// Neither prefixes nor suffixes have room left.
    #[error("item has no free affix slot")]
    SetFull,

    /// The same template is already on the item.
    #[error("affix '{0}' is already present")]
    AlreadyPresent(String),

    /// The affix is not on the item.
    #[error("affix '{0}' is not present")]
    NotPresent(String),

    /// A rolled-modifier index outside the instance.
    #[error("modifier index {index} out of range (instance has {len})")]
    ModifierIndexOutOfRange { index: usize, len: usize },

    /// An affix definition failed validation.
    #[error("invalid affix '{id}': {reason}")]
    InvalidTemplate { id: String, reason: String },

    /// A registry already holds a template with this id.
    #[error("affix '{0}' is already registered")]
    DuplicateTemplate(String),

    /// Restored rolled values do not line up with the template.
    #[error("affix '{id}' expects {expected} rolled values, got {actual}")]
    RolledValueMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },
}

fn category_suffix(category: &Option<AffixCategory>) -> String {
    match category {
        Some(category) => format!(" for {category}"),
        None => String::new(),
    }
}

impl AffixError {
    /// True when nothing could be rolled (the pool's NotFound condition).
    pub const fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            AffixError::NoEligibleAffix { .. } | AffixError::NonPositiveWeight { .. }
        )
    }

    /// True when an affix set rejected a placement.
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            AffixError::GroupOccupied { .. }
                | AffixError::CategoryFull { .. }
                | AffixError::AlreadyPresent(_)
                | AffixError::SetFull
        )
    }
}

impl PowerError for AffixError {
    fn severity(&self) -> ErrorSeverity {
        use AffixError::*;
        match self {
            NoEligibleAffix { .. }
            | NonPositiveWeight { .. }
            | GroupOccupied { .. }
            | CategoryFull { .. }
            | SetFull
            | AlreadyPresent(_) => ErrorSeverity::Recoverable,

            NotPresent(_)
            | ModifierIndexOutOfRange { .. }
            | InvalidTemplate { .. }
            | DuplicateTemplate(_)
            | RolledValueMismatch { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use AffixError::*;
        match self {
            NoEligibleAffix { .. } => "AFFIX_NO_ELIGIBLE",
            NonPositiveWeight { .. } => "AFFIX_NON_POSITIVE_WEIGHT",
            GroupOccupied { .. } => "AFFIX_GROUP_OCCUPIED",
            CategoryFull { .. } => "AFFIX_CATEGORY_FULL",
            SetFull => "AFFIX_SET_FULL",
            AlreadyPresent(_) => "AFFIX_ALREADY_PRESENT",
            NotPresent(_) => "AFFIX_NOT_PRESENT",
            ModifierIndexOutOfRange { .. } => "AFFIX_MODIFIER_INDEX_OUT_OF_RANGE",
            InvalidTemplate { .. } => "AFFIX_INVALID_TEMPLATE",
            DuplicateTemplate(_) => "AFFIX_DUPLICATE_TEMPLATE",
            RolledValueMismatch { .. } => "AFFIX_ROLLED_VALUE_MISMATCH",
        }
    }
}
