//! World ↔ screen projection
//!
//! Forward projection is consumed from the host viewer through
//! [`ForwardProjector`]; inverse floor projection is derived from it.

pub mod forward;
pub mod inverse;
pub mod perspective;

pub use forward::{CameraPose, ForwardProjector};
pub use inverse::{floor_point_from_screen, FloorJacobian};
pub use perspective::{PerspectiveCamera, PerspectiveProjector};

use thiserror::Error;

/// Why a screen point could not be mapped back onto the floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InversionFailure {
    /// |det J| below the configured threshold (camera edge-on to the floor)
    DegenerateJacobian {
        /// Determinant of the screen-from-floor Jacobian
        determinant: f32,
    },
    /// The reference point or one of the probes could not be projected
    ProbeUnavailable,
    /// No reference intersection was captured for this placement
    MissingReference,
}

/// Projection errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    /// Forward projection unavailable for a point this frame
    #[error("Point cannot be projected this frame")]
    Unprojectable,

    /// Inverse floor projection failed
    #[error("Floor projection is not invertible: {0:?}")]
    NotInvertible(InversionFailure),
}
