//! Forward projection boundary
//!
//! The host viewer owns the camera and the renderer. The overlay only ever
//! asks it one question: where does this world point land on screen right
//! now, and how deep is it?

use serde::{Serialize, Deserialize};

use crate::foundation::math::{Vec2, Vec3};
use crate::geometry::{ScreenPoint, ViewportSize, WorldPoint};

/// Camera snapshot delivered by the viewer
///
/// The overlay treats this as opaque: it is stored, compared and handed back
/// to the [`ForwardProjector`], never interpreted by placement code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Camera position in world space
    pub position: Vec3,
    /// Pitch and yaw in degrees (x = pitch, y = yaw)
    pub rotation: Vec2,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
}

impl CameraPose {
    /// Creates a new pose
    pub fn new(position: Vec3, pitch_degrees: f32, yaw_degrees: f32, field_of_view: f32) -> Self {
        Self {
            position,
            rotation: Vec2::new(pitch_degrees, yaw_degrees),
            field_of_view,
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.6, 0.0), 0.0, 0.0, 70.0)
    }
}

/// World → screen projection supplied by the host viewer
pub trait ForwardProjector {
    /// Project a world point for the given pose and viewport
    ///
    /// Returns `None` when the viewer cannot project the point at all. A
    /// returned point with negative depth is behind the camera.
    fn forward_project(
        &self,
        point: &WorldPoint,
        pose: &CameraPose,
        viewport: ViewportSize,
    ) -> Option<ScreenPoint>;

    /// Project and keep only points that may be rendered
    fn project_visible(
        &self,
        point: &WorldPoint,
        pose: &CameraPose,
        viewport: ViewportSize,
    ) -> Option<ScreenPoint> {
        self.forward_project(point, pose, viewport)
            .filter(ScreenPoint::is_visible)
    }
}

impl<F> ForwardProjector for F
where
    F: Fn(&WorldPoint, &CameraPose, ViewportSize) -> Option<ScreenPoint>,
{
    fn forward_project(
        &self,
        point: &WorldPoint,
        pose: &CameraPose,
        viewport: ViewportSize,
    ) -> Option<ScreenPoint> {
        self(point, pose, viewport)
    }
}
