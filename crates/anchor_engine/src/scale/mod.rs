//! Perspective scaling for rendered figures
//!
//! Two variants share the same user-facing strength knob:
//!
//! - [`depth_scale`] for anchored figures, driven by projected depth
//! - [`legacy_scale`] for 2D placements, driven by vertical screen position
//!
//! Both are monotonic for a fixed strength: a closer (or lower-in-frame)
//! figure never renders smaller than a farther one.

use crate::core::config::PerspectiveConfig;
use crate::foundation::math;

/// Lower bound of the depth scale with default configuration
pub const MIN_DEPTH_SCALE: f32 = 0.15;

/// Upper bound of the depth scale with default configuration
pub const MAX_DEPTH_SCALE: f32 = 3.0;

/// Depth-based scale with default constants
///
/// `strength` is in `[0, 1]`; zero disables the effect.
pub fn depth_scale(depth: f32, strength: f32) -> f32 {
    DepthScaler::default().scale(depth, strength)
}

/// Vertical-position scale for 2D placements
///
/// `normalized_y` is the figure's fraction of viewport height (feet
/// position), used as a stand-in for depth in a flat layout.
pub fn legacy_scale(normalized_y: f32, strength: f32) -> f32 {
    if strength <= 0.0 {
        return 1.0;
    }
    let strength = strength.min(1.0);
    let power = 1.5 + strength * 0.8;
    let min_scale = 1.0 - strength * 0.85;
    let max_scale = 1.0 + strength;
    math::lerp(min_scale, max_scale, normalized_y.clamp(0.0, 1.0).powf(power))
}

/// Depth scale parameterized by configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthScaler {
    reference_depth: f32,
    depth_guard: f32,
    min_scale: f32,
    max_scale: f32,
}

impl DepthScaler {
    /// Build a scaler from perspective configuration
    pub fn from_config(config: &PerspectiveConfig) -> Self {
        Self {
            reference_depth: config.reference_depth,
            depth_guard: config.depth_guard,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        }
    }

    /// Scale for a projected depth
    ///
    /// `reference_depth / max(depth, guard)` gives the raw perspective
    /// factor; strength interpolates from 1.0 towards it and the result is
    /// clamped to the configured bounds.
    pub fn scale(&self, depth: f32, strength: f32) -> f32 {
        if strength <= 0.0 {
            return 1.0;
        }
        let raw = self.reference_depth / depth.max(self.depth_guard);
        let blended = math::lerp(1.0, raw, strength.min(1.0));
        blended.max(self.min_scale).min(self.max_scale)
    }
}

impl Default for DepthScaler {
    fn default() -> Self {
        Self::from_config(&PerspectiveConfig::default())
    }
}
