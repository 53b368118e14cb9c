//! Error classification shared by [`AffixError`](crate::AffixError) and
//! [`StatError`](crate::StatError).
//!
//! Each error enum lives next to the operations that produce it and
//! implements [`PowerError`], so callers can decide how to react (retry,
//! reject, log) without matching on every variant, and logs carry a stable
//! code instead of free-form text.

/// How a caller should treat an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Exhaustion or a placement conflict; try another template or accept
    /// a smaller item.
    Recoverable,

    /// Bad content or a bad argument; retrying unchanged fails again.
    Validation,

    /// Internal state disagrees with itself.
    Internal,

    /// State is corrupted beyond use.
    Fatal,
}

impl ErrorSeverity {
    /// Lowercase name, used as a structured log field.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Severity and stable code of a power-core error.
pub trait PowerError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// SCREAMING_SNAKE identifier of the variant, e.g. `AFFIX_SET_FULL`.
    fn error_code(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_recoverable_is_recoverable() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        for severity in [
            ErrorSeverity::Validation,
            ErrorSeverity::Internal,
            ErrorSeverity::Fatal,
        ] {
            assert!(!severity.is_recoverable(), "{}", severity.as_str());
        }
    }

    #[test]
    fn severity_names_are_lowercase() {
        assert_eq!(ErrorSeverity::Recoverable.as_str(), "recoverable");
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
    }
}
