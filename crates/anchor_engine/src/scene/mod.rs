//! Placed figures and the roster that owns them

pub mod figure;
pub mod role;
pub mod roster;

pub use figure::{Anchor, Appearance, Figure, FigureRecord, Placement};
pub use role::{Role, RoleChoice, MIXED_WEIGHTS};
pub use roster::{FigureId, FigureRoster, Occupancy, OccupancyLevel, RosterExport};
