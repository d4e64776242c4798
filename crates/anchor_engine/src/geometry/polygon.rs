//! Lasso polygons in normalized viewport space
//!
//! A polygon is implicitly closed: the last vertex connects back to the
//! first. Containment uses the even-odd (parity) rule with a horizontal ray
//! cast towards +X.
//!
//! ## Edge classification
//!
//! An edge is only considered when the half-open test
//! `(yi > py) != (yj > py)` passes, and a crossing only counts when
//! `px < x_cross` holds strictly. For an axis-aligned square this means points
//! on the left and bottom edges (smaller x, smaller y) are inside while points
//! on the right and top edges are outside. Classification is deterministic for
//! any given input.

use super::{GeometryError, NormalizedPoint};

/// Axis-aligned bounding box in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Smallest x and y
    pub min: NormalizedPoint,
    /// Largest x and y
    pub max: NormalizedPoint,
}

impl BoundingBox {
    /// Box width
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Box height
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Box area
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Map fractional coordinates within the box to a point
    pub fn point_at(&self, fx: f32, fy: f32) -> NormalizedPoint {
        NormalizedPoint::new(
            self.min.x + self.width() * fx,
            self.min.y + self.height() * fy,
        )
    }
}

/// Closed polygon with at least three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<NormalizedPoint>,
}

impl Polygon {
    /// Minimum number of vertices for a polygon
    pub const MIN_VERTICES: usize = 3;

    /// Create a polygon, rejecting fewer than three vertices
    pub fn new(vertices: Vec<NormalizedPoint>) -> Result<Self, GeometryError> {
        if vertices.len() < Self::MIN_VERTICES {
            return Err(GeometryError::TooFewVertices { count: vertices.len() });
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle from two opposite corners
    pub fn rectangle(a: NormalizedPoint, b: NormalizedPoint) -> Self {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        Self {
            vertices: vec![
                NormalizedPoint::new(x0, y0),
                NormalizedPoint::new(x1, y0),
                NormalizedPoint::new(x1, y1),
                NormalizedPoint::new(x0, y1),
            ],
        }
    }

    /// Polygon vertices in drawing order
    pub fn vertices(&self) -> &[NormalizedPoint] {
        &self.vertices
    }

    /// Axis-aligned bounding box of all vertices
    pub fn bounding_box(&self) -> BoundingBox {
        let first = self.vertices[0];
        let (mut min, mut max) = (first, first);
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        BoundingBox { min, max }
    }

    /// Ray-casting parity test (see module docs for edge handling)
    pub fn contains(&self, point: NormalizedPoint) -> bool {
        let (px, py) = (point.x, point.y);
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (self.vertices[i].x, self.vertices[i].y);
            let (xj, yj) = (self.vertices[j].x, self.vertices[j].y);
            if (yi > py) != (yj > py) {
                let x_cross = (xj - xi) * (py - yi) / (yj - yi) + xi;
                if px < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Unsigned area (shoelace formula)
    pub fn area(&self) -> f32 {
        let n = self.vertices.len();
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        (twice * 0.5).abs()
    }

    /// Share of the bounding box covered by the polygon
    pub fn fill_ratio(&self) -> f32 {
        let box_area = self.bounding_box().area();
        if box_area <= f32::EPSILON {
            0.0
        } else {
            self.area() / box_area
        }
    }
}
