//! Per-frame visual state
//!
//! Re-derives where every figure is drawn, how large, and in which stacking
//! order. Anchored figures go through the forward projector and the depth
//! scale; legacy figures keep their fixed viewport fraction and use the
//! vertical-position scale.

use crate::core::config::PerspectiveConfig;
use crate::geometry::{NormalizedPoint, ViewportSize};
use crate::projection::{CameraPose, ForwardProjector};
use crate::scale::{legacy_scale, DepthScaler};
use crate::scene::{Anchor, FigureId, FigureRoster, Placement};

/// Whether a figure is drawn this frame, and where (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    /// Drawn with its feet at this pixel position
    Visible {
        /// Pixels from the left edge
        x: f32,
        /// Pixels from the top edge
        y: f32,
    },
    /// Not drawn (behind the camera, unprojectable, or no pose yet)
    Hidden,
}

/// Render instructions for one figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Figure this state belongs to
    pub figure_id: FigureId,
    /// Screen position or hidden
    pub visibility: Visibility,
    /// Final size multiplier, manual scale included
    pub scale: f32,
    /// Stacking order; higher draws on top
    pub stack_order: i32,
}

impl VisualState {
    /// Whether the figure is drawn
    pub fn is_visible(&self) -> bool {
        matches!(self.visibility, Visibility::Visible { .. })
    }
}

/// Stacking order for a projected depth: closer is higher, never below 1
pub fn depth_stack_order(depth: f32) -> i32 {
    (1000.0 - depth * 10.0).round().max(1.0) as i32
}

/// Stacking order for a legacy figure: lower in frame is higher
pub fn legacy_stack_order(normalized_y: f32) -> i32 {
    (normalized_y * 1000.0).round() as i32
}

/// One position-update pass over a roster
pub struct VisualPass<'a, P: ForwardProjector + ?Sized> {
    projector: &'a P,
    pose: Option<&'a CameraPose>,
    viewport: ViewportSize,
    scaler: DepthScaler,
    strength: f32,
}

impl<'a, P: ForwardProjector + ?Sized> VisualPass<'a, P> {
    /// Prepare a pass
    ///
    /// `pose` is `None` when the viewer has not published one yet or the
    /// overlay runs in 2D mode; anchored figures are hidden in that case.
    pub fn new(
        projector: &'a P,
        pose: Option<&'a CameraPose>,
        viewport: ViewportSize,
        perspective: &PerspectiveConfig,
    ) -> Self {
        Self {
            projector,
            pose,
            viewport,
            scaler: DepthScaler::from_config(perspective),
            strength: perspective.strength(),
        }
    }

    /// Compute the state of every figure in roster order
    ///
    /// Returns `None` without touching anything when the viewport has not
    /// been laid out.
    pub fn run(&self, roster: &FigureRoster) -> Option<Vec<VisualState>> {
        if !self.viewport.is_laid_out() {
            log::trace!("Skipping position update: viewport not laid out");
            return None;
        }

        let states = roster
            .iter()
            .map(|(id, figure)| {
                let (visibility, scale, stack_order) = match &figure.placement {
                    Placement::Anchored(anchor) => self.anchored(id, anchor),
                    Placement::Legacy(point) => self.legacy(*point),
                };
                VisualState {
                    figure_id: id,
                    visibility,
                    scale: scale * figure.manual_scale,
                    stack_order,
                }
            })
            .collect();
        Some(states)
    }

    fn anchored(&self, id: FigureId, anchor: &Anchor) -> (Visibility, f32, i32) {
        let projected = self
            .pose
            .and_then(|pose| self.projector.project_visible(&anchor.position, pose, self.viewport));

        match projected {
            Some(screen) => (
                Visibility::Visible { x: screen.x, y: screen.y },
                self.scaler.scale(screen.depth, self.strength),
                depth_stack_order(screen.depth),
            ),
            None => {
                log::trace!("Figure {:?} not projectable this frame", id);
                (Visibility::Hidden, 1.0, 0)
            }
        }
    }

    fn legacy(&self, point: NormalizedPoint) -> (Visibility, f32, i32) {
        let pixels = point.to_pixels(self.viewport);
        (
            Visibility::Visible { x: pixels.x, y: pixels.y },
            legacy_scale(point.y, self.strength),
            legacy_stack_order(point.y),
        )
    }
}
