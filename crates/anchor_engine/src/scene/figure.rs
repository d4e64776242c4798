//! Placed figures

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::geometry::{NormalizedPoint, WorldPoint};

use super::role::Role;

/// Number of color variants a figure can be drawn with
pub const COLOR_VARIANTS: u8 = 8;

/// Number of pose variants a figure can be drawn with
pub const POSE_VARIANTS: u8 = 100;

/// How a figure is drawn, independent of where it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    /// Index into the color palette, `0..COLOR_VARIANTS`
    pub color_index: u8,
    /// Index into the pose set, `0..POSE_VARIANTS`
    pub pose_index: u8,
    /// Mirror horizontally
    pub flip: bool,
}

impl Appearance {
    /// Draw a random appearance
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            color_index: rng.gen_range(0..COLOR_VARIANTS),
            pose_index: rng.gen_range(0..POSE_VARIANTS),
            flip: rng.gen_bool(0.5),
        }
    }
}

/// A world position bound to one figure
///
/// The floor index is copied from the intersection the anchor was created
/// from and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Position on the floor plane
    pub position: WorldPoint,
    /// Floor the anchor belongs to
    pub floor_index: Option<u32>,
}

impl Anchor {
    /// Creates a new anchor
    pub fn new(position: WorldPoint, floor_index: Option<u32>) -> Self {
        Self { position, floor_index }
    }
}

/// Where a figure is placed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// Follows a world position as the camera moves
    Anchored(Anchor),
    /// Pinned to a viewport fraction (2D mode or failed inversion)
    Legacy(NormalizedPoint),
}

impl Placement {
    /// Whether the placement follows the camera
    pub fn is_anchored(&self) -> bool {
        matches!(self, Self::Anchored(_))
    }
}

/// One figure in the roster
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Display name, unique at creation time
    pub name: String,
    /// Occupant role
    pub role: Role,
    /// Drawing variant
    pub appearance: Appearance,
    /// User-adjusted size multiplier (1.0 by default)
    pub manual_scale: f32,
    /// Anchor or fixed screen position
    pub placement: Placement,
}

/// Exported form of a figure
///
/// Anchored figures carry `anchor` and `floor_index`; legacy figures carry
/// `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRecord {
    /// Display name
    pub name: String,
    /// Occupant role
    pub role: Role,
    /// World anchor, for anchored figures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<WorldPoint>,
    /// Floor of the anchor, for anchored figures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_index: Option<u32>,
    /// Viewport fraction, for legacy figures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<NormalizedPoint>,
}

impl From<&Figure> for FigureRecord {
    fn from(figure: &Figure) -> Self {
        let (anchor, floor_index, position) = match figure.placement {
            Placement::Anchored(a) => (Some(a.position), a.floor_index, None),
            Placement::Legacy(p) => (None, None, Some(p)),
        };
        Self {
            name: figure.name.clone(),
            role: figure.role,
            anchor,
            floor_index,
            position,
        }
    }
}
