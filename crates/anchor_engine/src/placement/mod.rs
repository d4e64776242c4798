//! Figure placement
//!
//! - [`PlacementSession`]: the interactive single/bulk state machine
//! - [`Promoter`]: turns screen placements into world anchors, or legacy
//!   placements when that is not possible

pub mod promote;
pub mod session;

pub use promote::{Promoter, SingleTarget};
pub use session::{BulkRequest, PlacementMode, PlacementSession, MAX_BULK_COUNT};

use thiserror::Error;

use crate::geometry::GeometryError;
use crate::scene::FigureId;

/// Placement session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Lasso input arrived while not in bulk mode
    #[error("No bulk placement in progress")]
    NotInBulkMode,

    /// The viewport has no size yet
    #[error("Viewport has not been laid out")]
    ViewportNotLaidOut,

    /// The lasso could not form a polygon
    #[error("Invalid lasso: {0}")]
    Geometry(#[from] GeometryError),
}

/// Result of one bulk placement
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkOutcome {
    /// Figures added, in placement order
    pub placed: Vec<FigureId>,
    /// Number of figures the lasso asked for
    pub requested: usize,
    /// Figures anchored in world space
    pub anchored: usize,
    /// Figures kept at a fixed screen position
    pub legacy: usize,
}

impl BulkOutcome {
    /// Whether sampling ran out of attempts before reaching the request
    pub fn is_short(&self) -> bool {
        self.placed.len() < self.requested
    }
}
