//! # Reference Perspective Projector
//!
//! A pinhole camera implementation of [`ForwardProjector`], used by the demo
//! host and by tests that need a realistic (non-affine) projection.
//!
//! ## Coordinate System
//! World space is right-handed and Y-up. Yaw 0 looks down -Z, positive yaw
//! turns towards -X, positive pitch looks up. Screen space is Y-down with the
//! origin at the top-left pixel; depth is the view-space distance along the
//! viewing direction.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::geometry::{ScreenPoint, ViewportSize, WorldPoint};

use super::forward::{CameraPose, ForwardProjector};

/// Pitch is kept away from straight up/down so the view basis stays defined
const MAX_PITCH_DEGREES: f32 = 89.0;

/// Perspective camera built from a [`CameraPose`]
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl PerspectiveCamera {
    /// Build a camera from a viewer pose
    pub fn from_pose(pose: &CameraPose, aspect: f32, near: f32, far: f32) -> Self {
        let pitch = pose.rotation.x.clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES).to_radians();
        let yaw = pose.rotation.y.to_radians();
        let forward = Vec3::new(
            -yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        );

        Self {
            position: pose.position,
            target: pose.position + forward,
            up: Vec3::y(),
            fov: pose.field_of_view.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined P × X × V transform (X flips into Y-down, Z-forward space)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * Mat4::screen_coordinate_transform() * self.view_matrix()
    }

    /// Project a world point into viewport pixels
    ///
    /// Returns `None` only for points on the camera plane, where the
    /// perspective divide is undefined. Points behind the camera come back
    /// with negative depth.
    pub fn project(&self, point: &WorldPoint, viewport: ViewportSize) -> Option<ScreenPoint> {
        let clip = self.view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w.abs() < f32::EPSILON {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let x = (ndc_x + 1.0) * 0.5 * viewport.width as f32;
        let y = (ndc_y + 1.0) * 0.5 * viewport.height as f32;
        Some(ScreenPoint::new(x, y, clip.w))
    }
}

/// Pinhole forward projector with fixed clip planes
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveProjector {
    /// Near clipping distance
    pub near: f32,
    /// Far clipping distance
    pub far: f32,
}

impl PerspectiveProjector {
    /// Create a projector with the given clip planes
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// Camera for a pose and viewport
    pub fn camera(&self, pose: &CameraPose, viewport: ViewportSize) -> PerspectiveCamera {
        PerspectiveCamera::from_pose(pose, viewport.aspect(), self.near, self.far)
    }
}

impl Default for PerspectiveProjector {
    fn default() -> Self {
        Self::new(0.1, 1000.0)
    }
}

impl ForwardProjector for PerspectiveProjector {
    fn forward_project(
        &self,
        point: &WorldPoint,
        pose: &CameraPose,
        viewport: ViewportSize,
    ) -> Option<ScreenPoint> {
        if !viewport.is_laid_out() {
            return None;
        }
        self.camera(pose, viewport).project(point, viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn level_pose() -> CameraPose {
        CameraPose::new(Vec3::new(0.0, 1.5, 0.0), 0.0, 0.0, 90.0)
    }

    #[test]
    fn test_point_straight_ahead_projects_to_center() {
        let viewport = ViewportSize::new(800, 600);
        let projector = PerspectiveProjector::default();
        let screen = projector
            .forward_project(&Vec3::new(0.0, 1.5, -4.0), &level_pose(), viewport)
            .unwrap();

        assert_relative_eq!(screen.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(screen.y, 300.0, epsilon = 1e-3);
        assert_relative_eq!(screen.depth, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_floor_point_is_below_center() {
        let viewport = ViewportSize::new(800, 600);
        let projector = PerspectiveProjector::default();
        let screen = projector
            .forward_project(&Vec3::new(0.0, 0.0, -4.0), &level_pose(), viewport)
            .unwrap();

        // Y-down screen: a point below eye level lands in the lower half
        assert!(screen.y > 300.0);
    }

    #[test]
    fn test_point_behind_camera_has_negative_depth() {
        let viewport = ViewportSize::new(800, 600);
        let projector = PerspectiveProjector::default();
        let screen = projector
            .forward_project(&Vec3::new(0.0, 1.5, 4.0), &level_pose(), viewport)
            .unwrap();

        assert!(screen.depth < 0.0);
        assert!(!screen.is_visible());
    }

    #[test]
    fn test_yaw_turns_view() {
        let viewport = ViewportSize::new(800, 600);
        let projector = PerspectiveProjector::default();
        // Yaw 90 looks down -X
        let pose = CameraPose::new(Vec3::new(0.0, 1.5, 0.0), 0.0, 90.0, 90.0);
        let screen = projector
            .forward_project(&Vec3::new(-5.0, 1.5, 0.0), &pose, viewport)
            .unwrap();

        assert_relative_eq!(screen.x, 400.0, epsilon = 1e-2);
        assert_relative_eq!(screen.depth, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_unlaid_viewport_is_unprojectable() {
        let projector = PerspectiveProjector::default();
        let result = projector.forward_project(&Vec3::zeros(), &level_pose(), ViewportSize::new(0, 0));
        assert!(result.is_none());
    }
}
