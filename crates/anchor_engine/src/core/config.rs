//! # Unified Configuration System
//!
//! All tunables of the overlay in one place: perspective scaling, region
//! sampling, inverse projection, viewer connection and roster limits.
//!
//! ## Design Goals
//!
//! - **Centralized**: every constant the placement math depends on is here
//! - **Serializable**: loadable from TOML or RON through [`Config`]
//! - **Type Safe**: builder methods plus `validate()` before use

use serde::{Serialize, Deserialize};
use std::time::Duration;

pub use crate::config::{Config, ConfigError};

/// # Perspective Configuration
///
/// Controls how strongly projected depth changes the rendered size of an
/// anchored figure, and the bounds the resulting scale is clamped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveConfig {
    /// User-facing strength in percent (0 disables the effect)
    pub strength_percent: u8,
    /// Depth at which a figure renders at its base size
    pub reference_depth: f32,
    /// Smallest depth used as a divisor
    pub depth_guard: f32,
    /// Lower bound of the final depth scale
    pub min_scale: f32,
    /// Upper bound of the final depth scale
    pub max_scale: f32,
}

impl PerspectiveConfig {
    /// Strength as a 0..1 interpolation factor
    pub fn strength(&self) -> f32 {
        f32::from(self.strength_percent.min(100)) / 100.0
    }

    /// Set perspective strength in percent
    pub fn with_strength_percent(mut self, percent: u8) -> Self {
        self.strength_percent = percent.min(100);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strength_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "perspective strength must be 0..=100, got {}",
                self.strength_percent
            )));
        }
        if !positive(self.reference_depth) || !positive(self.depth_guard) {
            return Err(ConfigError::Invalid(
                "reference depth and depth guard must be positive".to_string(),
            ));
        }
        if !positive(self.min_scale) || !positive(self.max_scale) || self.max_scale < self.min_scale {
            return Err(ConfigError::Invalid(format!(
                "depth scale bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_scale, self.max_scale
            )));
        }
        Ok(())
    }
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            strength_percent: 70,
            reference_depth: 8.0,
            depth_guard: 0.5,
            min_scale: 0.15,
            max_scale: 3.0,
        }
    }
}

/// # Sampling Configuration
///
/// Parameters of the center-biased lasso sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Attempts allowed per requested point
    pub attempt_multiplier: usize,
    /// Standard deviation of the center-biased draw
    pub spread: f32,
    /// Lowest fraction a draw is clamped to
    pub clamp_min: f32,
    /// Highest fraction a draw is clamped to
    pub clamp_max: f32,
}

impl SamplingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempt_multiplier == 0 {
            return Err(ConfigError::Invalid(
                "sampling attempt multiplier must be at least 1".to_string(),
            ));
        }
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sampling spread must be a finite non-negative value, got {}",
                self.spread
            )));
        }
        if !(0.0..=1.0).contains(&self.clamp_min)
            || !(0.0..=1.0).contains(&self.clamp_max)
            || self.clamp_min > self.clamp_max
        {
            return Err(ConfigError::Invalid(format!(
                "sampling clamp range must lie in [0, 1], got [{}, {}]",
                self.clamp_min, self.clamp_max
            )));
        }
        Ok(())
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            attempt_multiplier: 20,
            spread: 0.2,
            clamp_min: 0.02,
            clamp_max: 0.98,
        }
    }
}

/// # Projection Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Jacobians with |det| below this are treated as degenerate
    pub determinant_epsilon: f32,
    /// World-space offset used for the finite-difference probes
    pub probe_offset: f32,
}

impl ProjectionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.determinant_epsilon) || !positive(self.probe_offset) {
            return Err(ConfigError::Invalid(
                "projection epsilon and probe offset must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            determinant_epsilon: 0.001,
            probe_offset: 1.0,
        }
    }
}

/// # Viewer Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Seconds to wait for the viewer before falling back to 2D mode
    pub connect_timeout_secs: u64,
}

impl ViewerConfig {
    /// Connection timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self { connect_timeout_secs: 30 }
    }
}

/// # Roster Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Occupancy limit figures are compared against
    pub occupancy_limit: usize,
    /// Smallest per-figure manual scale
    pub min_manual_scale: f32,
    /// Largest per-figure manual scale
    pub max_manual_scale: f32,
}

impl RosterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.occupancy_limit == 0 {
            return Err(ConfigError::Invalid("occupancy limit must be at least 1".to_string()));
        }
        if !positive(self.min_manual_scale)
            || !positive(self.max_manual_scale)
            || self.max_manual_scale < self.min_manual_scale
        {
            return Err(ConfigError::Invalid(format!(
                "manual scale bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_manual_scale, self.max_manual_scale
            )));
        }
        Ok(())
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            occupancy_limit: 50,
            min_manual_scale: 0.25,
            max_manual_scale: 4.0,
        }
    }
}

/// # Complete Overlay Configuration
///
/// Top-level configuration that encompasses all overlay subsystems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Default log level (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Depth scaling
    pub perspective: PerspectiveConfig,
    /// Lasso sampling
    pub sampling: SamplingConfig,
    /// Inverse floor projection
    pub projection: ProjectionConfig,
    /// Viewer connection
    pub viewer: ViewerConfig,
    /// Figure roster
    pub roster: RosterConfig,
}

impl OverlayConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            perspective: PerspectiveConfig::default(),
            sampling: SamplingConfig::default(),
            projection: ProjectionConfig::default(),
            viewer: ViewerConfig::default(),
            roster: RosterConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set perspective strength in percent
    pub fn with_perspective_strength(mut self, percent: u8) -> Self {
        self.perspective = self.perspective.with_strength_percent(percent);
        self
    }

    /// Set the viewer connection timeout
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.viewer.connect_timeout_secs = secs;
        self
    }

    /// Set the occupancy limit
    pub fn with_occupancy_limit(mut self, limit: usize) -> Self {
        self.roster.occupancy_limit = limit;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.perspective.validate()?;
        self.sampling.validate()?;
        self.projection.validate()?;
        self.roster.validate()
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for OverlayConfig {}

/// Finite and strictly positive (rejects NaN and infinities)
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = OverlayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.perspective.strength_percent, 70);
        assert_eq!(config.sampling.attempt_multiplier, 20);
        assert_eq!(config.viewer.connect_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_strength_percent_is_capped() {
        let config = OverlayConfig::new().with_perspective_strength(250);
        assert_eq!(config.perspective.strength_percent, 100);
        assert!((config.perspective.strength() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut config = OverlayConfig::default();
        config.sampling.spread = -0.1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = OverlayConfig::default();
        config.sampling.spread = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = OverlayConfig::default();
        config.perspective.reference_depth = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = OverlayConfig::default();
        config.perspective.depth_guard = f32::NAN;
        assert!(config.perspective.validate().is_err());

        let mut config = OverlayConfig::default();
        config.projection.determinant_epsilon = f32::NAN;
        assert!(config.projection.validate().is_err());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = OverlayConfig::default();
        config.projection.probe_offset = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.roster.max_manual_scale = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_scale_bounds_rejected() {
        let mut config = OverlayConfig::default();
        config.perspective.min_scale = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_partial_document_fills_defaults() {
        let text = "log_level = \"debug\"\n[perspective]\nstrength_percent = 40\n";
        let config = OverlayConfig::from_str_with_format(text, "overlay.toml").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.perspective.strength_percent, 40);
        assert_eq!(config.perspective.reference_depth, 8.0);
        assert_eq!(config.roster.occupancy_limit, 50);
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = OverlayConfig::new().with_occupancy_limit(120);
        let text = config.to_string_with_format("overlay.ron").unwrap();
        let parsed = OverlayConfig::from_str_with_format(&text, "overlay.ron").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = OverlayConfig::from_str_with_format("", "overlay.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
