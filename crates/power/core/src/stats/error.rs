//! Attribute manager errors.
//!
//! Reads never fail: unknown attributes read as zero. The only rejected
//! mutation is installing a formula that would make recomputation recurse
//! forever.

use super::kind::AttributeKind;
use crate::error::{ErrorSeverity, PowerError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    /// The formula's dependency closure reaches the attribute it computes.
    #[error("formula for {attribute} depends on itself (via {via})")]
    FormulaCycle {
        attribute: AttributeKind,
        via: AttributeKind,
    },
}

impl PowerError for StatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StatError::FormulaCycle { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StatError::FormulaCycle { .. } => "STAT_FORMULA_CYCLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_cycle_is_a_validation_error() {
        let err = StatError::FormulaCycle {
            attribute: AttributeKind::MaxHealth,
            via: AttributeKind::Vitality,
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "STAT_FORMULA_CYCLE");
        assert_eq!(
            err.to_string(),
            "formula for max_health depends on itself (via vitality)"
        );
    }
}
