//! Bulk placement sampling
//!
//! Turns a user-drawn lasso into a set of candidate placement points.

pub mod jitter;
pub mod region;

pub use jitter::{centered_fraction, centered_pair};
pub use region::{sample, RegionSampler, SampleOutcome};
