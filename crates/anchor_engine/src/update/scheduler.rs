//! One-frame debounce for position updates
//!
//! The viewer can publish many poses between two display frames. Each
//! notification only records the latest pose and raises a pending flag; the
//! host drains the flag once per frame, so a burst of any length costs one
//! pass, and that pass sees the last pose of the burst.

use crate::projection::CameraPose;

/// Pending-flag scheduler for position update passes
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: bool,
    latest: Option<CameraPose>,
    notifications: u64,
    passes: u64,
}

impl FrameScheduler {
    /// Create an idle scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new pose and schedule a pass for the next frame
    pub fn request(&mut self, pose: CameraPose) {
        self.latest = Some(pose);
        self.notifications += 1;
        if self.pending {
            log::trace!("Pose coalesced into pending update");
        }
        self.pending = true;
    }

    /// Schedule a pass without a new pose (viewport resize, roster edit)
    pub fn request_refresh(&mut self) {
        self.pending = true;
    }

    /// Drop the scheduled pass; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Whether a pass is scheduled
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the scheduled pass at a frame boundary
    ///
    /// Returns `Some` with the pose the pass should use (`None` inside when no
    /// pose has been published yet), or `None` when nothing was scheduled.
    pub fn take_due(&mut self) -> Option<Option<CameraPose>> {
        if !self.cancel() {
            return None;
        }
        self.passes += 1;
        Some(self.latest)
    }

    /// Latest recorded pose
    pub fn latest_pose(&self) -> Option<CameraPose> {
        self.latest
    }

    /// Forget the recorded pose and any pending pass
    pub fn reset(&mut self) {
        self.pending = false;
        self.latest = None;
    }

    /// Pose notifications received so far
    pub fn notifications(&self) -> u64 {
        self.notifications
    }

    /// Passes handed out so far
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
