//! Axis-aligned bounds and the quadrant split used by every node.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the four sub-regions a node splits into.
///
/// The discriminants give the fixed child order: northwest, southwest,
/// northeast, southeast. Y grows northwards.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthWest = 0,
    SouthWest = 1,
    NorthEast = 2,
    SouthEast = 3,
}

impl Quadrant {
    /// All quadrants in child order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::SouthWest,
        Quadrant::NorthEast,
        Quadrant::SouthEast,
    ];

    /// Index of this quadrant in a node's child array.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Create bounds from an origin and a size.
    #[inline]
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Create the square bounds around a circle.
    #[inline]
    pub fn from_center(cx: f32, cy: f32, half_size: f32) -> Self {
        Self {
            min_x: cx - half_size,
            min_y: cy - half_size,
            max_x: cx + half_size,
            max_y: cy + half_size,
        }
    }

    /// Get the width of the bounds.
    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Get the height of the bounds.
    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Get center X.
    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }

    /// Get center Y.
    #[inline]
    pub fn center_y(&self) -> f32 {
        (self.min_y + self.max_y) / 2.0
    }

    /// Whether the point lies inside. Edges are inclusive on all four sides.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Check if two bounds overlap. Touching edges count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    /// Squared distance from the point to the closest point of the bounds.
    ///
    /// Zero when the point is inside.
    #[inline]
    pub fn distance_sq(&self, point: Vec2) -> f32 {
        let dx = (self.min_x - point.x).max(0.0).max(point.x - self.max_x);
        let dy = (self.min_y - point.y).max(0.0).max(point.y - self.max_y);
        dx * dx + dy * dy
    }

    /// Exact circle/rectangle intersection test.
    #[inline]
    pub fn intersects_circle(&self, center: Vec2, radius_sq: f32) -> bool {
        self.distance_sq(center) <= radius_sq
    }

    /// The quadrant a point falls into.
    ///
    /// A point on a split line goes east (`x >= center_x`) or north
    /// (`y >= center_y`). Insertion relies on this being the only rule.
    #[inline]
    pub fn quadrant(&self, x: f32, y: f32) -> Quadrant {
        let east = x >= self.center_x();
        let north = y >= self.center_y();
        match (east, north) {
            (false, true) => Quadrant::NorthWest,
            (false, false) => Quadrant::SouthWest,
            (true, true) => Quadrant::NorthEast,
            (true, false) => Quadrant::SouthEast,
        }
    }

    /// The sub-bounds covering one quadrant.
    pub fn quadrant_bounds(&self, quadrant: Quadrant) -> Bounds {
        let cx = self.center_x();
        let cy = self.center_y();
        match quadrant {
            Quadrant::NorthWest => Bounds::new(self.min_x, cy, cx, self.max_y),
            Quadrant::SouthWest => Bounds::new(self.min_x, self.min_y, cx, cy),
            Quadrant::NorthEast => Bounds::new(cx, cy, self.max_x, self.max_y),
            Quadrant::SouthEast => Bounds::new(cx, self.min_y, self.max_x, cy),
        }
    }

    /// Whether the bounds have finite coordinates and a positive area.
    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
            && self.width() > 0.0
            && self.height() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_overlaps() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 15.0, 15.0);
        let c = Bounds::new(20.0, 20.0, 30.0, 30.0);
        let touching = Bounds::new(10.0, 0.0, 20.0, 10.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
        assert!(a.overlaps(&touching));
    }

    #[test]
    fn test_contains_edges() {
        let b = Bounds::from_xywh(10.0, 10.0, 400.0, 400.0);
        assert!(b.contains(10.0, 10.0));
        assert!(b.contains(410.0, 410.0));
        assert!(!b.contains(9.99, 50.0));
        assert!(!b.contains(50.0, 410.01));
        assert!(!b.contains(f32::NAN, 50.0));
    }

    #[test]
    fn test_quadrant_tie_break() {
        let b = Bounds::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(b.quadrant(50.0, 50.0), Quadrant::NorthEast);
        assert_eq!(b.quadrant(49.9, 50.0), Quadrant::NorthWest);
        assert_eq!(b.quadrant(49.9, 49.9), Quadrant::SouthWest);
        assert_eq!(b.quadrant(50.0, 49.9), Quadrant::SouthEast);

        // Every point must land in a child that contains it.
        for &(x, y) in &[(50.0, 50.0), (0.0, 0.0), (100.0, 100.0), (50.0, 0.0), (0.0, 50.0)] {
            let q = b.quadrant(x, y);
            assert!(b.quadrant_bounds(q).contains(x, y), "({x}, {y}) not in {q:?}");
        }
    }

    #[test]
    fn test_quadrant_bounds_cover_parent() {
        let b = Bounds::new(-8.0, -4.0, 8.0, 4.0);
        let nw = b.quadrant_bounds(Quadrant::NorthWest);
        let se = b.quadrant_bounds(Quadrant::SouthEast);
        assert_eq!(nw, Bounds::new(-8.0, 0.0, 0.0, 4.0));
        assert_eq!(se, Bounds::new(0.0, -4.0, 8.0, 0.0));
        let area: f32 = Quadrant::ALL
            .iter()
            .map(|&q| {
                let c = b.quadrant_bounds(q);
                c.width() * c.height()
            })
            .sum();
        assert_eq!(area, b.width() * b.height());
    }

    #[test]
    fn test_distance_sq() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(b.distance_sq(Vec2::new(5.0, 5.0)), 0.0);
        assert_eq!(b.distance_sq(Vec2::new(13.0, 5.0)), 9.0);
        assert_eq!(b.distance_sq(Vec2::new(-3.0, 14.0)), 25.0);
        assert!(b.intersects_circle(Vec2::new(13.0, 14.0), 25.0));
        assert!(!b.intersects_circle(Vec2::new(13.0, 14.0), 24.9));
    }

    #[test]
    fn test_is_valid() {
        assert!(Bounds::from_xywh(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Bounds::from_xywh(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!Bounds::from_xywh(0.0, 0.0, 1.0, -1.0).is_valid());
        assert!(!Bounds::from_xywh(f32::NAN, 0.0, 1.0, 1.0).is_valid());
        assert!(!Bounds::from_xywh(0.0, 0.0, f32::INFINITY, 1.0).is_valid());
    }
}
