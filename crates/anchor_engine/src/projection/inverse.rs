//! # Inverse Floor Projection
//!
//! Recovers a world position on a horizontal floor plane from a screen
//! position, using nothing but the viewer's forward projection.
//!
//! ## Method
//!
//! The reference point and two probes offset by one world unit along +X and
//! +Z (same height) are forward-projected. Their pixel differences form the
//! local Jacobian
//!
//! ```text
//! J = [ dsx/dX  dsx/dZ ]
//!     [ dsy/dX  dsy/dZ ]
//! ```
//!
//! which maps floor displacement to screen displacement, assuming the
//! projection is locally affine around the reference. Inverting `J` and
//! applying it to the pixel delta between the target and the reference gives
//! the floor displacement.
//!
//! ## Known limitation
//!
//! Accuracy degrades with distance from the reference point and with steep
//! viewing angles, and is unbounded for strongly distorted projections over
//! large regions. This is an accepted approximation: the linearization is not
//! refined iteratively.

use crate::core::config::ProjectionConfig;
use crate::foundation::math::{Mat2, Vec2, Vec3};
use crate::geometry::{ViewportSize, WorldPoint};

use super::forward::{CameraPose, ForwardProjector};
use super::{InversionFailure, ProjectionError};

/// Local linearization of forward projection around a floor point
#[derive(Debug, Clone, Copy)]
pub struct FloorJacobian {
    reference: WorldPoint,
    reference_screen: Vec2,
    screen_from_floor: Mat2,
    floor_from_screen: Mat2,
}

impl FloorJacobian {
    /// Probe the projector around `reference` and invert the result
    pub fn probe<P: ForwardProjector + ?Sized>(
        projector: &P,
        reference: WorldPoint,
        pose: &CameraPose,
        viewport: ViewportSize,
        config: &ProjectionConfig,
    ) -> Result<Self, ProjectionError> {
        let offset = config.probe_offset;
        let project = |point: WorldPoint| {
            projector
                .project_visible(&point, pose, viewport)
                .map(|s| s.position())
                .ok_or(ProjectionError::NotInvertible(InversionFailure::ProbeUnavailable))
        };

        let reference_screen = project(reference)?;
        let plus_x = project(reference + Vec3::new(offset, 0.0, 0.0))?;
        let plus_z = project(reference + Vec3::new(0.0, 0.0, offset))?;

        // Columns: screen displacement per world unit along X and Z
        let basis_x = (plus_x - reference_screen) / offset;
        let basis_z = (plus_z - reference_screen) / offset;
        let screen_from_floor = Mat2::new(
            basis_x.x, basis_z.x,
            basis_x.y, basis_z.y,
        );

        let determinant = screen_from_floor.determinant();
        if !determinant.is_finite() || determinant.abs() < config.determinant_epsilon {
            return Err(ProjectionError::NotInvertible(InversionFailure::DegenerateJacobian {
                determinant,
            }));
        }

        let floor_from_screen = screen_from_floor.try_inverse().ok_or(
            ProjectionError::NotInvertible(InversionFailure::DegenerateJacobian { determinant }),
        )?;

        Ok(Self {
            reference,
            reference_screen,
            screen_from_floor,
            floor_from_screen,
        })
    }

    /// Floor position under a screen pixel
    pub fn floor_point(&self, screen: Vec2) -> Result<WorldPoint, ProjectionError> {
        let delta = self.floor_from_screen * (screen - self.reference_screen);
        let point = Vec3::new(
            self.reference.x + delta.x,
            self.reference.y,
            self.reference.z + delta.y,
        );
        if point.iter().all(|c| c.is_finite()) {
            Ok(point)
        } else {
            Err(ProjectionError::NotInvertible(InversionFailure::DegenerateJacobian {
                determinant: self.determinant(),
            }))
        }
    }

    /// Determinant of the screen-from-floor Jacobian
    pub fn determinant(&self) -> f32 {
        self.screen_from_floor.determinant()
    }

    /// Screen position of the reference point
    pub fn reference_screen(&self) -> Vec2 {
        self.reference_screen
    }
}

/// Recover the floor point under `screen`, linearizing around `reference`
///
/// The returned point keeps the reference height. Fails with
/// [`ProjectionError::NotInvertible`] when the camera is nearly edge-on to the
/// floor or when the reference or a probe cannot be projected; callers must
/// fall back to a 2D placement rather than guess.
pub fn floor_point_from_screen<P: ForwardProjector + ?Sized>(
    projector: &P,
    screen: Vec2,
    reference: WorldPoint,
    pose: &CameraPose,
    viewport: ViewportSize,
    config: &ProjectionConfig,
) -> Result<WorldPoint, ProjectionError> {
    FloorJacobian::probe(projector, reference, pose, viewport, config)?.floor_point(screen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScreenPoint;
    use crate::projection::PerspectiveProjector;
    use approx::assert_relative_eq;

    /// Affine floor projector: s = A·(x, z) + b, depth from z
    fn affine(p: &WorldPoint, _: &CameraPose, _: ViewportSize) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(
            400.0 + 30.0 * p.x - 5.0 * p.z,
            300.0 + 4.0 * p.x + 20.0 * p.z,
            10.0 - p.z,
        ))
    }

    /// Collapses Z onto X so the Jacobian has rank one
    fn edge_on(p: &WorldPoint, _: &CameraPose, _: ViewportSize) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(100.0 + 10.0 * (p.x + p.z), 200.0 + 5.0 * (p.x + p.z), 5.0))
    }

    fn viewport() -> ViewportSize {
        ViewportSize::new(800, 600)
    }

    #[test]
    fn test_affine_roundtrip_recovers_point() {
        let pose = CameraPose::default();
        let config = ProjectionConfig::default();
        let reference = Vec3::new(1.0, 0.25, -2.0);
        let target = Vec3::new(3.5, 0.25, 1.75);

        let screen = affine(&target, &pose, viewport()).unwrap().position();
        let recovered =
            floor_point_from_screen(&affine, screen, reference, &pose, viewport(), &config).unwrap();

        assert_relative_eq!(recovered, target, epsilon = 1e-3);
    }

    #[test]
    fn test_height_is_taken_from_reference() {
        let pose = CameraPose::default();
        let config = ProjectionConfig::default();
        let reference = Vec3::new(0.0, -1.2, 0.0);

        let recovered = floor_point_from_screen(
            &affine,
            Vec2::new(500.0, 350.0),
            reference,
            &pose,
            viewport(),
            &config,
        )
        .unwrap();

        assert_eq!(recovered.y, -1.2);
    }

    #[test]
    fn test_zero_determinant_is_not_invertible() {
        let pose = CameraPose::default();
        let config = ProjectionConfig::default();
        let result = floor_point_from_screen(
            &edge_on,
            Vec2::new(150.0, 220.0),
            Vec3::zeros(),
            &pose,
            viewport(),
            &config,
        );

        assert!(matches!(
            result,
            Err(ProjectionError::NotInvertible(InversionFailure::DegenerateJacobian { .. }))
        ));
    }

    #[test]
    fn test_unprojectable_reference_is_not_invertible() {
        let behind = |_: &WorldPoint, _: &CameraPose, _: ViewportSize| Some(ScreenPoint::new(0.0, 0.0, -1.0));
        let result = floor_point_from_screen(
            &behind,
            Vec2::new(10.0, 10.0),
            Vec3::zeros(),
            &CameraPose::default(),
            viewport(),
            &ProjectionConfig::default(),
        );

        assert!(matches!(
            result,
            Err(ProjectionError::NotInvertible(InversionFailure::ProbeUnavailable))
        ));
    }

    #[test]
    fn test_perspective_roundtrip_near_reference() {
        // Real perspective is only locally affine: points close to the
        // reference come back close to where they started.
        let projector = PerspectiveProjector::default();
        let pose = CameraPose::new(Vec3::new(0.0, 1.6, 0.0), -30.0, 0.0, 70.0);
        let config = ProjectionConfig::default();
        let reference = Vec3::new(0.0, 0.0, -4.0);
        let target = Vec3::new(0.1, 0.0, -4.1);

        let screen = projector.forward_project(&target, &pose, viewport()).unwrap().position();
        let recovered =
            floor_point_from_screen(&projector, screen, reference, &pose, viewport(), &config).unwrap();

        assert_relative_eq!(recovered.x, target.x, epsilon = 0.03);
        assert_relative_eq!(recovered.z, target.z, epsilon = 0.03);
    }

    #[test]
    fn test_jacobian_reports_determinant() {
        let jacobian = FloorJacobian::probe(
            &affine,
            Vec3::zeros(),
            &CameraPose::default(),
            viewport(),
            &ProjectionConfig::default(),
        )
        .unwrap();

        // det([30 -5; 4 20]) = 600 + 20
        assert_relative_eq!(jacobian.determinant(), 620.0, epsilon = 1e-2);
        assert_relative_eq!(jacobian.reference_screen(), Vec2::new(400.0, 300.0));
    }
}
