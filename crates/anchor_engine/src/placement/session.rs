//! Interactive placement session
//!
//! Tracks what the user is in the middle of placing. Bulk mode captures the
//! viewer's hover intersection on entry, because the lasso surface covers the
//! viewer while drawing and no further intersections arrive. Nothing reaches
//! the roster until a lasso is finished; cancelling at any point discards the
//! session.

use crate::foundation::math::Vec2;
use crate::geometry::{NormalizedPoint, Polygon, ViewportSize};
use crate::scene::{Role, RoleChoice};
use crate::viewer::{FloorContext, HoverIntersection};

use super::PlacementError;

/// Largest number of figures a single lasso may request
pub const MAX_BULK_COUNT: usize = 200;

/// What the session is placing
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementMode {
    /// Not placing anything
    Idle,
    /// Each click places one figure of this role
    Single {
        /// Role given to each figure
        role: Role,
    },
    /// A lasso places `count` figures
    Bulk {
        /// Requested number of figures
        count: usize,
        /// Role assignment
        role_choice: RoleChoice,
        /// Hover intersection captured when bulk mode started
        saved_intersection: Option<HoverIntersection>,
    },
}

/// Finished lasso, ready to be sampled and placed
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    /// Lasso in viewport fractions
    pub polygon: Polygon,
    /// Requested number of figures
    pub count: usize,
    /// Role assignment
    pub role_choice: RoleChoice,
    /// Reference for inverse projection, if one was captured
    pub floor_context: Option<FloorContext>,
}

/// Placement state machine
#[derive(Debug, Clone)]
pub struct PlacementSession {
    mode: PlacementMode,
    lasso: Vec<Vec2>,
    drawing: bool,
}

impl PlacementSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            mode: PlacementMode::Idle,
            lasso: Vec::new(),
            drawing: false,
        }
    }

    /// Enter single placement mode
    pub fn begin_single(&mut self, role: Role) {
        self.cancel();
        self.mode = PlacementMode::Single { role };
    }

    /// Enter bulk mode, capturing the current hover intersection
    ///
    /// `count` is clamped to `1..=MAX_BULK_COUNT`.
    pub fn begin_bulk(
        &mut self,
        count: usize,
        role_choice: RoleChoice,
        intersection: Option<HoverIntersection>,
    ) {
        self.cancel();
        if intersection.is_none() {
            log::debug!("Bulk mode entered without a hover intersection");
        }
        self.mode = PlacementMode::Bulk {
            count: count.clamp(1, MAX_BULK_COUNT),
            role_choice,
            saved_intersection: intersection,
        };
    }

    /// Begin drawing a lasso at a pixel position
    pub fn press(&mut self, pixel: Vec2) -> Result<(), PlacementError> {
        if !matches!(self.mode, PlacementMode::Bulk { .. }) {
            return Err(PlacementError::NotInBulkMode);
        }
        self.drawing = true;
        self.lasso.clear();
        self.lasso.push(pixel);
        Ok(())
    }

    /// Extend the lasso being drawn
    pub fn drag(&mut self, pixel: Vec2) {
        if self.drawing {
            self.lasso.push(pixel);
        }
    }

    /// Close the lasso and turn it into a bulk request
    ///
    /// On success the session returns to idle. A lasso with fewer than three
    /// points is discarded but bulk mode stays active so the user can redraw.
    pub fn release(&mut self, viewport: ViewportSize) -> Result<BulkRequest, PlacementError> {
        let PlacementMode::Bulk { count, role_choice, saved_intersection } = self.mode.clone() else {
            return Err(PlacementError::NotInBulkMode);
        };
        self.drawing = false;
        let pixels = std::mem::take(&mut self.lasso);

        if !viewport.is_laid_out() {
            return Err(PlacementError::ViewportNotLaidOut);
        }
        let vertices = pixels
            .iter()
            .filter_map(|p| NormalizedPoint::from_pixels(p.x, p.y, viewport))
            .collect();
        let polygon = Polygon::new(vertices)?;

        self.cancel();
        Ok(BulkRequest {
            polygon,
            count,
            role_choice,
            floor_context: saved_intersection.map(FloorContext::from),
        })
    }

    /// Abandon whatever is in progress
    pub fn cancel(&mut self) {
        self.mode = PlacementMode::Idle;
        self.lasso.clear();
        self.drawing = false;
    }

    /// Current mode
    pub fn mode(&self) -> &PlacementMode {
        &self.mode
    }

    /// Whether any placement mode is active
    pub fn is_active(&self) -> bool {
        !matches!(self.mode, PlacementMode::Idle)
    }

    /// Whether a lasso is being drawn
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Lasso points captured so far, in pixels
    pub fn lasso(&self) -> &[Vec2] {
        &self.lasso
    }
}

impl Default for PlacementSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::geometry::GeometryError;

    fn hit() -> HoverIntersection {
        HoverIntersection::on_floor(Vec3::new(0.0, -1.0, -4.0), Some(2))
    }

    fn draw_triangle(session: &mut PlacementSession) {
        session.press(Vec2::new(100.0, 100.0)).unwrap();
        session.drag(Vec2::new(300.0, 100.0));
        session.drag(Vec2::new(200.0, 250.0));
    }

    #[test]
    fn test_bulk_lasso_produces_normalized_request() {
        let mut session = PlacementSession::new();
        session.begin_bulk(25, RoleChoice::Mixed, Some(hit()));
        draw_triangle(&mut session);

        let request = session.release(ViewportSize::new(400, 500)).unwrap();

        assert_eq!(request.count, 25);
        assert_eq!(request.polygon.vertices()[1], NormalizedPoint::new(0.75, 0.2));
        assert_eq!(request.floor_context, Some(FloorContext::from(hit())));
        assert!(!session.is_active());
    }

    #[test]
    fn test_intersection_is_captured_on_entry() {
        let mut session = PlacementSession::new();
        session.begin_bulk(5, RoleChoice::Fixed(Role::Staff), None);
        draw_triangle(&mut session);

        let request = session.release(ViewportSize::new(400, 500)).unwrap();
        assert!(request.floor_context.is_none());
    }

    #[test]
    fn test_short_lasso_keeps_bulk_mode() {
        let mut session = PlacementSession::new();
        session.begin_bulk(5, RoleChoice::Mixed, Some(hit()));
        session.press(Vec2::new(10.0, 10.0)).unwrap();
        session.drag(Vec2::new(20.0, 20.0));

        let result = session.release(ViewportSize::new(400, 500));
        assert_eq!(
            result,
            Err(PlacementError::Geometry(GeometryError::TooFewVertices { count: 2 }))
        );
        assert!(matches!(session.mode(), PlacementMode::Bulk { .. }));
        assert!(session.lasso().is_empty());
    }

    #[test]
    fn test_cancel_discards_everything() {
        let mut session = PlacementSession::new();
        session.begin_bulk(5, RoleChoice::Mixed, Some(hit()));
        draw_triangle(&mut session);
        session.cancel();

        assert!(!session.is_active());
        assert!(!session.is_drawing());
        assert!(session.lasso().is_empty());
        assert_eq!(session.release(ViewportSize::new(400, 500)), Err(PlacementError::NotInBulkMode));
    }

    #[test]
    fn test_count_is_clamped() {
        let mut session = PlacementSession::new();
        session.begin_bulk(10_000, RoleChoice::Mixed, None);
        assert!(matches!(session.mode(), PlacementMode::Bulk { count: MAX_BULK_COUNT, .. }));

        session.begin_bulk(0, RoleChoice::Mixed, None);
        assert!(matches!(session.mode(), PlacementMode::Bulk { count: 1, .. }));
    }

    #[test]
    fn test_lasso_requires_bulk_mode() {
        let mut session = PlacementSession::new();
        session.begin_single(Role::Teacher);
        assert_eq!(session.press(Vec2::new(1.0, 1.0)), Err(PlacementError::NotInBulkMode));
    }
}
