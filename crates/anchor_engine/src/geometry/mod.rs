//! Geometry primitives for screen, world and normalized viewport space

pub mod types;
pub mod polygon;

pub use types::{WorldPoint, ScreenPoint, NormalizedPoint, ViewportSize};
pub use polygon::{Polygon, BoundingBox};

use thiserror::Error;

/// Geometry construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A polygon needs at least three vertices
    #[error("Polygon needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// Number of vertices supplied
        count: usize,
    },
}
