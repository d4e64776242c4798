//! Host viewer boundary
//!
//! Everything the overlay learns about the 3D viewer arrives through this
//! module: the connection lifecycle, the latest camera pose, and the latest
//! pointer hover intersection.

pub mod context;
pub mod link;

pub use context::{FloorContext, HoverIntersection, ObserverId, PoseObserver, ViewerContext};
pub use link::{ConnectPoll, ConnectionState, LinkEvent, ViewerConnector, ViewerLink};

use std::time::Duration;
use thiserror::Error;

/// Viewer connection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// The viewer reported that it cannot be reached
    #[error("Viewer unavailable: {0}")]
    Unavailable(String),

    /// The viewer did not become ready within the configured timeout
    #[error("Viewer did not connect within {0:?}")]
    Timeout(Duration),
}
