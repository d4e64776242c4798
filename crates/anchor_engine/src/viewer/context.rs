//! Viewer session state
//!
//! Holds the latest camera pose and hover intersection reported by the
//! viewer, plus the pose observers registered against them. All of it is
//! owned by one [`ViewerContext`] and dropped together on
//! [`ViewerContext::disconnect`].

use serde::{Serialize, Deserialize};
use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Vec3;
use crate::geometry::WorldPoint;
use crate::projection::CameraPose;

new_key_type! {
    /// Handle returned by [`ViewerContext::subscribe_pose`]
    pub struct ObserverId;
}

/// Where the viewer's pointer currently hits the scanned model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverIntersection {
    /// Hit position in world space
    pub position: WorldPoint,
    /// Floor the hit belongs to, when the viewer knows it
    pub floor_index: Option<u32>,
    /// Surface normal at the hit
    pub normal: Vec3,
}

impl HoverIntersection {
    /// Creates a new hover intersection with an upward normal
    pub fn on_floor(position: WorldPoint, floor_index: Option<u32>) -> Self {
        Self {
            position,
            floor_index,
            normal: Vec3::y(),
        }
    }
}

/// Reference a placement is linearized around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorContext {
    /// Known point on the target floor plane
    pub reference: WorldPoint,
    /// Floor identifier copied onto every anchor created from this context
    pub floor_index: Option<u32>,
}

impl From<HoverIntersection> for FloorContext {
    fn from(hit: HoverIntersection) -> Self {
        Self {
            reference: hit.position,
            floor_index: hit.floor_index,
        }
    }
}

/// Receives every pose the viewer publishes
pub trait PoseObserver {
    /// Called once per published pose, in arrival order
    fn on_pose(&mut self, pose: &CameraPose);
}

impl<F> PoseObserver for F
where
    F: FnMut(&CameraPose),
{
    fn on_pose(&mut self, pose: &CameraPose) {
        self(pose);
    }
}

/// Latest viewer state and the observers listening to it
#[derive(Default)]
pub struct ViewerContext {
    pose: Option<CameraPose>,
    intersection: Option<HoverIntersection>,
    observers: SlotMap<ObserverId, Box<dyn PoseObserver>>,
}

impl ViewerContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pose observer
    pub fn subscribe_pose(&mut self, observer: Box<dyn PoseObserver>) -> ObserverId {
        self.observers.insert(observer)
    }

    /// Remove a pose observer; returns whether it was registered
    pub fn unsubscribe_pose(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id).is_some()
    }

    /// Store a new pose and forward it to every observer
    pub fn publish_pose(&mut self, pose: CameraPose) {
        self.pose = Some(pose);
        for observer in self.observers.values_mut() {
            observer.on_pose(&pose);
        }
    }

    /// Store the latest hover intersection (`None` when the pointer is off
    /// the model)
    pub fn update_intersection(&mut self, intersection: Option<HoverIntersection>) {
        self.intersection = intersection;
    }

    /// Latest published pose
    pub fn current_pose(&self) -> Option<CameraPose> {
        self.pose
    }

    /// Borrow the latest published pose
    pub fn pose(&self) -> Option<&CameraPose> {
        self.pose.as_ref()
    }

    /// Latest hover intersection
    pub fn current_intersection(&self) -> Option<HoverIntersection> {
        self.intersection
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Drop all observers and cached viewer state
    pub fn disconnect(&mut self) {
        let dropped = self.observers.len();
        self.observers.clear();
        self.pose = None;
        self.intersection = None;
        log::debug!("Viewer context torn down ({} observers dropped)", dropped);
    }
}

impl std::fmt::Debug for ViewerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerContext")
            .field("pose", &self.pose)
            .field("intersection", &self.intersection)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_observers_see_poses_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut context = ViewerContext::new();
        let sink = Rc::clone(&seen);
        context.subscribe_pose(Box::new(move |pose: &CameraPose| {
            sink.borrow_mut().push(pose.rotation.y);
        }));

        for yaw in [10.0, 20.0, 30.0] {
            context.publish_pose(CameraPose::new(Vec3::zeros(), 0.0, yaw, 70.0));
        }

        assert_eq!(*seen.borrow(), vec![10.0, 20.0, 30.0]);
        assert_eq!(context.current_pose().map(|p| p.rotation.y), Some(30.0));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut context = ViewerContext::new();
        let sink = Rc::clone(&count);
        let id = context.subscribe_pose(Box::new(move |_: &CameraPose| *sink.borrow_mut() += 1));

        context.publish_pose(CameraPose::default());
        assert!(context.unsubscribe_pose(id));
        assert!(!context.unsubscribe_pose(id));
        context.publish_pose(CameraPose::default());

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_disconnect_clears_everything() {
        let mut context = ViewerContext::new();
        context.subscribe_pose(Box::new(|_: &CameraPose| {}));
        context.publish_pose(CameraPose::default());
        context.update_intersection(Some(HoverIntersection::on_floor(Vec3::zeros(), Some(1))));

        context.disconnect();

        assert_eq!(context.observer_count(), 0);
        assert!(context.current_pose().is_none());
        assert!(context.current_intersection().is_none());
    }

    #[test]
    fn test_floor_context_from_intersection() {
        let hit = HoverIntersection::on_floor(Vec3::new(1.0, -0.5, 2.0), Some(3));
        let context = FloorContext::from(hit);
        assert_eq!(context.reference, hit.position);
        assert_eq!(context.floor_index, Some(3));
    }
}
