//! Position update loop
//!
//! Pose notifications are debounced by [`FrameScheduler`]; each due frame
//! runs one [`VisualPass`] over the roster.

pub mod scheduler;
pub mod visual;

pub use scheduler::FrameScheduler;
pub use visual::{depth_stack_order, legacy_stack_order, Visibility, VisualPass, VisualState};
