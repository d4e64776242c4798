//! Promotion of screen placements to world anchors
//!
//! A placement becomes an [`Anchor`] when the overlay is connected to the
//! viewer and has a floor reference to linearize around. Anything else
//! degrades to a legacy placement at the same viewport fraction, one point at
//! a time, so a failed inversion never drops a figure.

use crate::core::config::ProjectionConfig;
use crate::geometry::{NormalizedPoint, ViewportSize, WorldPoint};
use crate::projection::{CameraPose, FloorJacobian, ForwardProjector, InversionFailure, ProjectionError};
use crate::scene::{Anchor, Placement};
use crate::viewer::FloorContext;

/// Where a single placement was requested
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SingleTarget {
    /// A world position reported by the viewer (pointer hit)
    World(WorldPoint),
    /// A click on the overlay surface
    Screen(NormalizedPoint),
}

/// Promotes placements against one pose and viewport
pub struct Promoter<'a, P: ForwardProjector + ?Sized> {
    projector: &'a P,
    pose: Option<&'a CameraPose>,
    viewport: ViewportSize,
    config: &'a ProjectionConfig,
}

impl<'a, P: ForwardProjector + ?Sized> Promoter<'a, P> {
    /// Create a promoter
    ///
    /// `pose` is `None` in 2D mode; every screen placement then stays legacy.
    pub fn new(
        projector: &'a P,
        pose: Option<&'a CameraPose>,
        viewport: ViewportSize,
        config: &'a ProjectionConfig,
    ) -> Self {
        Self {
            projector,
            pose,
            viewport,
            config,
        }
    }

    /// Resolve one placement
    ///
    /// A world target has no screen fraction to fall back to, so in 2D mode
    /// it is rejected with `None` instead of becoming an anchor that can
    /// never be shown.
    pub fn single(&self, target: SingleTarget, floor: Option<FloorContext>) -> Option<Placement> {
        match target {
            SingleTarget::World(position) => {
                if self.pose.is_none() {
                    log::warn!("World placement at {:?} rejected: viewer is in 2D mode", position);
                    return None;
                }
                Some(Placement::Anchored(Anchor::new(position, floor.and_then(|f| f.floor_index))))
            }
            SingleTarget::Screen(point) => {
                let Some(pose) = self.pose else {
                    return Some(Placement::Legacy(point));
                };
                let result = self
                    .jacobian(floor, pose)
                    .and_then(|(jacobian, floor)| self.anchor(&jacobian, floor, point));
                Some(match result {
                    Ok(anchor) => Placement::Anchored(anchor),
                    Err(error) => {
                        log::warn!("Single placement kept in 2D: {}", error);
                        Placement::Legacy(point)
                    }
                })
            }
        }
    }

    /// Resolve a batch of sampled points
    ///
    /// The Jacobian is probed once for the whole batch. Failures are reported
    /// with a single warning however many points fell back.
    pub fn batch(&self, points: &[NormalizedPoint], floor: Option<FloorContext>) -> Vec<Placement> {
        let Some(pose) = self.pose else {
            return points.iter().copied().map(Placement::Legacy).collect();
        };

        let (jacobian, floor) = match self.jacobian(floor, pose) {
            Ok(probed) => probed,
            Err(error) => {
                log::warn!("Placing {} figures in 2D: {}", points.len(), error);
                return points.iter().copied().map(Placement::Legacy).collect();
            }
        };

        let mut first_error = None;
        let mut failed = 0;
        let placements = points
            .iter()
            .map(|&point| match self.anchor(&jacobian, floor, point) {
                Ok(anchor) => Placement::Anchored(anchor),
                Err(error) => {
                    failed += 1;
                    first_error.get_or_insert(error);
                    Placement::Legacy(point)
                }
            })
            .collect();

        if let Some(error) = first_error {
            log::warn!("{} of {} figures placed in 2D: {}", failed, points.len(), error);
        }
        placements
    }

    fn jacobian(
        &self,
        floor: Option<FloorContext>,
        pose: &CameraPose,
    ) -> Result<(FloorJacobian, FloorContext), ProjectionError> {
        let floor = floor.ok_or(ProjectionError::NotInvertible(InversionFailure::MissingReference))?;
        let jacobian = FloorJacobian::probe(self.projector, floor.reference, pose, self.viewport, self.config)?;
        Ok((jacobian, floor))
    }

    fn anchor(
        &self,
        jacobian: &FloorJacobian,
        floor: FloorContext,
        point: NormalizedPoint,
    ) -> Result<Anchor, ProjectionError> {
        let position = jacobian.floor_point(point.to_pixels(self.viewport))?;
        Ok(Anchor::new(position, floor.floor_index))
    }
}
