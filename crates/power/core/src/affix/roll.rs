//! Unit-interval draws used to roll modifier values.
//!
//! Both functions return `t ∈ [0, 1)`; callers map it into a modifier's
//! range with [`ModifierTemplate::lerp`](super::template::ModifierTemplate::lerp).

use rand::Rng;

/// Neutral bias: a plain uniform draw.
pub const NEUTRAL_BIAS: f64 = 0.5;

/// Bell-curve approximation: the mean of three uniform draws.
///
/// Concentrates values near the middle of the range without a true normal
/// distribution.
pub fn bell_curve<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let sum: f64 = (0..3).map(|_| rng.gen_range(0.0..1.0)).sum();
    sum / 3.0
}

/// A single uniform draw skewed by `bias ∈ [0, 1]`.
///
/// Below [`NEUTRAL_BIAS`] the draw is pushed through `1 - (1 - r)^k`, which
/// leans toward 1; above it through `r^k`, which leans toward 0. The exponent
/// `k` grows with the distance from neutral. Out-of-range biases are clamped.
pub fn biased<R: Rng + ?Sized>(rng: &mut R, bias: f64) -> f64 {
    let r: f64 = rng.gen_range(0.0..1.0);
    skew(r, bias)
}

fn skew(r: f64, bias: f64) -> f64 {
    let bias = if bias.is_nan() {
        NEUTRAL_BIAS
    } else {
        bias.clamp(0.0, 1.0)
    };

    if bias < NEUTRAL_BIAS {
        1.0 - (1.0 - r).powf(1.0 + (NEUTRAL_BIAS - bias) * 4.0)
    } else if bias > NEUTRAL_BIAS {
        r.powf(1.0 + (bias - NEUTRAL_BIAS) * 4.0)
    } else {
        r
    }
}
