//! Center-biased random fractions
//!
//! A Box–Muller style draw centered on 0.5, clamped to a bounded tail. Used
//! to cluster bulk placements towards the middle of a region rather than
//! spreading them uniformly.

use std::f32::consts::TAU;

use rand::Rng;

use crate::core::config::SamplingConfig;

/// Draw one center-biased fraction using the sampling configuration
pub fn centered_fraction<R: Rng + ?Sized>(rng: &mut R, config: &SamplingConfig) -> f32 {
    let u1: f32 = rng.gen();
    let u2: f32 = rng.gen();
    // gen() may return exactly 0.0, where ln is -inf
    let u1 = u1.max(f32::MIN_POSITIVE);
    let value = 0.5 + config.spread * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
    value.max(config.clamp_min).min(config.clamp_max)
}

/// Draw a pair of independent center-biased fractions
pub fn centered_pair<R: Rng + ?Sized>(rng: &mut R, config: &SamplingConfig) -> (f32, f32) {
    let fx = centered_fraction(rng, config);
    let fy = centered_fraction(rng, config);
    (fx, fy)
}
