//! # Core Module
//!
//! Shared configuration used by every overlay subsystem.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for perspective, sampling, projection,
//!   viewer connection and roster limits
//! - **Foundation**: Low-level utilities (math, time, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    OverlayConfig,
    PerspectiveConfig,
    SamplingConfig,
    ProjectionConfig,
    ViewerConfig,
    RosterConfig,
    Config,
    ConfigError,
};
