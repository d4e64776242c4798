//! Point and viewport types shared by projection, sampling and placement

use serde::{Serialize, Deserialize};

use crate::foundation::math::{Vec2, Vec3};

/// A position in the viewer's world space (`y` is up)
pub type WorldPoint = Vec3;

/// A projected pixel position plus a depth scalar
///
/// Depth is distance-like but not necessarily metric. A negative depth means
/// the point is behind the camera and must not be rendered or scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Pixels from the left edge of the viewport
    pub x: f32,
    /// Pixels from the top edge of the viewport
    pub y: f32,
    /// Depth along the view direction
    pub depth: f32,
}

impl ScreenPoint {
    /// Creates a new screen point
    pub fn new(x: f32, y: f32, depth: f32) -> Self {
        Self { x, y, depth }
    }

    /// Whether this point may be rendered this frame
    pub fn is_visible(&self) -> bool {
        self.depth >= 0.0 && self.x.is_finite() && self.y.is_finite() && self.depth.is_finite()
    }

    /// Pixel position without depth
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A viewport-relative position, `[0, 1]` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    /// Fraction of viewport width
    pub x: f32,
    /// Fraction of viewport height
    pub y: f32,
}

impl NormalizedPoint {
    /// Creates a new normalized point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert a pixel position into viewport fractions
    ///
    /// Returns `None` when the viewport has not been laid out yet.
    pub fn from_pixels(x: f32, y: f32, viewport: ViewportSize) -> Option<Self> {
        if !viewport.is_laid_out() {
            return None;
        }
        Some(Self {
            x: x / viewport.width as f32,
            y: y / viewport.height as f32,
        })
    }

    /// Convert back into pixels for the given viewport
    pub fn to_pixels(self, viewport: ViewportSize) -> Vec2 {
        Vec2::new(self.x * viewport.width as f32, self.y * viewport.height as f32)
    }

    /// Clamp both coordinates into `[0, 1]`
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }
}

/// Pixel size of the viewer's viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Creates a new viewport size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A viewport with a zero dimension has not been laid out yet
    pub fn is_laid_out(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width divided by height (1.0 when not laid out)
    pub fn aspect(&self) -> f32 {
        if self.is_laid_out() {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }
}
