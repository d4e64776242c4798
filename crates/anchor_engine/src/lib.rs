//! # Anchor Engine
//!
//! Coordinate projection and spatial placement for figures overlaid on a 3D
//! scan viewer.
//!
//! ## Features
//!
//! - **Inverse Floor Projection**: screen clicks become floor anchors through a
//!   local Jacobian of the viewer's own forward projection
//! - **Lasso Sampling**: center-biased point sampling inside freehand polygons
//! - **Depth Scaling**: bounded, monotonic perspective scale per figure
//! - **Debounced Updates**: pose bursts collapse into one pass per frame
//! - **2D Fallback**: every placement degrades gracefully when the viewer is
//!   unavailable or the projection cannot be inverted
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anchor_engine::prelude::*;
//! use rand::SeedableRng;
//!
//! struct AlwaysReady;
//!
//! impl ViewerConnector for AlwaysReady {
//!     fn poll_connect(&mut self) -> ConnectPoll {
//!         ConnectPoll::Ready
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut overlay = Overlay::new(
//!         OverlayConfig::default(),
//!         PerspectiveProjector::default(),
//!         Box::new(AlwaysReady),
//!         Box::new(rand::rngs::StdRng::seed_from_u64(7)),
//!     )?;
//!     overlay.set_viewport(ViewportSize::new(1280, 720));
//!     overlay.connect();
//!     overlay.advance_connection(std::time::Duration::from_millis(16));
//!
//!     overlay.on_pose_changed(CameraPose::default());
//!     if let Some(states) = overlay.on_frame() {
//!         println!("{} figures", states.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod foundation;
pub mod config;

// Geometry and projection
pub mod geometry;
pub mod projection;
pub mod scale;
pub mod sampling;

// Placement and state
pub mod scene;
pub mod placement;
pub mod update;
pub mod viewer;

mod overlay;

pub use overlay::{Overlay, DEFAULT_ROLE};

use thiserror::Error;

/// Errors surfaced by the overlay
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid geometry input
    #[error("Geometry error: {0}")]
    Geometry(#[from] geometry::GeometryError),

    /// Projection failure
    #[error("Projection error: {0}")]
    Projection(#[from] projection::ProjectionError),

    /// Viewer connection failure
    #[error("Viewer error: {0}")]
    Viewer(#[from] viewer::ViewerError),

    /// Placement session misuse
    #[error("Placement error: {0}")]
    Placement(#[from] placement::PlacementError),
}

/// Common imports for overlay hosts
pub mod prelude {
    pub use crate::{
        Overlay, OverlayError,
        core::config::{Config, OverlayConfig},
        foundation::math::{Vec2, Vec3},
        geometry::{NormalizedPoint, Polygon, ScreenPoint, ViewportSize, WorldPoint},
        projection::{CameraPose, ForwardProjector, PerspectiveProjector},
        placement::{BulkOutcome, SingleTarget},
        scene::{FigureId, Placement, Role, RoleChoice},
        update::{Visibility, VisualState},
        viewer::{ConnectPoll, FloorContext, HoverIntersection, LinkEvent, ViewerConnector},
    };
}
