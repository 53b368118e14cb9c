//! Formula system for derived attributes.
//!
//! A formula computes an attribute entirely from other attributes' current
//! values and declares which attributes it reads, so the manager can
//! invalidate it when any of them change.
//!
//! ## Examples
//!
//! ```
//! # use power_core::stats::{AttributeKind, Formula};
//! // 2 × Strength
//! let attack = Formula::multiply(AttributeKind::Strength, 2.0);
//!
//! // 50 + 10 × Vitality
//! let life = Formula::weighted_sum(50.0, &[AttributeKind::Vitality], &[10.0]);
//!
//! assert_eq!(life.dependencies(), vec![AttributeKind::Vitality]);
//! # let _ = attack;
//! ```

use std::fmt;
use std::sync::Arc;

use super::kind::AttributeKind;

/// Read access to current attribute values.
///
/// Formulas evaluate against this trait rather than the concrete manager so
/// they can be exercised against any attribute source.
pub trait AttributeReader {
    /// Current value of `attribute`; unknown attributes read as zero.
    fn get(&self, attribute: AttributeKind) -> f64;
}

impl<F> AttributeReader for F
where
    F: Fn(AttributeKind) -> f64,
{
    fn get(&self, attribute: AttributeKind) -> f64 {
        self(attribute)
    }
}

/// Signature of a custom formula body.
pub type FormulaFn = dyn Fn(&dyn AttributeReader) -> f64 + Send + Sync;

/// Formula for calculating an attribute from other attributes.
#[derive(Clone)]
pub enum Formula {
    /// `source × multiplier`
    Multiply {
        source: AttributeKind,
        multiplier: f64,
    },

    /// `base + Σ value(attribute_i) × weight_i`
    WeightedSum {
        base: f64,
        terms: Vec<(AttributeKind, f64)>,
    },

    /// Caller-supplied function.
    ///
    /// Dependencies cannot be inferred from a closure, so the caller must list
    /// every attribute the function reads.
    Custom {
        name: String,
        dependencies: Vec<AttributeKind>,
        function: Arc<FormulaFn>,
    },
}

impl Formula {
    pub fn multiply(source: AttributeKind, multiplier: f64) -> Self {
        Formula::Multiply { source, multiplier }
    }

    /// Build a weighted sum. Attributes without a matching weight use `1.0`.
    pub fn weighted_sum(base: f64, attributes: &[AttributeKind], weights: &[f64]) -> Self {
        let terms = attributes
            .iter()
            .enumerate()
            .map(|(i, attribute)| (*attribute, weights.get(i).copied().unwrap_or(1.0)))
            .collect();
        Formula::WeightedSum { base, terms }
    }

    pub fn custom<F>(name: impl Into<String>, dependencies: &[AttributeKind], function: F) -> Self
    where
        F: Fn(&dyn AttributeReader) -> f64 + Send + Sync + 'static,
    {
        Formula::Custom {
            name: name.into(),
            dependencies: dependencies.to_vec(),
            function: Arc::new(function),
        }
    }

    /// Attributes this formula reads.
    pub fn dependencies(&self) -> Vec<AttributeKind> {
        match self {
            Formula::Multiply { source, .. } => vec![*source],
            Formula::WeightedSum { terms, .. } => {
                let mut deps: Vec<AttributeKind> = terms.iter().map(|(a, _)| *a).collect();
                deps.sort_unstable();
                deps.dedup();
                deps
            }
            Formula::Custom { dependencies, .. } => dependencies.clone(),
        }
    }

    /// Evaluate the formula against current attribute values.
    pub fn calculate(&self, reader: &dyn AttributeReader) -> f64 {
        match self {
            Formula::Multiply { source, multiplier } => reader.get(*source) * multiplier,
            Formula::WeightedSum { base, terms } => terms
                .iter()
                .fold(*base, |acc, (attribute, weight)| {
                    acc + reader.get(*attribute) * weight
                }),
            Formula::Custom { function, .. } => function(reader),
        }
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Multiply { source, multiplier } => f
                .debug_struct("Multiply")
                .field("source", source)
                .field("multiplier", multiplier)
                .finish(),
            Formula::WeightedSum { base, terms } => f
                .debug_struct("WeightedSum")
                .field("base", base)
                .field("terms", terms)
                .finish(),
            Formula::Custom {
                name, dependencies, ..
            } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("dependencies", dependencies)
                .finish_non_exhaustive(),
        }
    }
}
