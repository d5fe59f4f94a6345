//! Ordered, deduplicated point collection and the owned snapshots traces run on.
//!
//! Invariants
//! - No two points in a `PointSet` share exact `(x, y)`; duplicates are rejected.
//! - `Point::id` is the insertion index and never changes while the point lives.
//! - A `Snapshot` is an owned copy; mutating the set afterwards cannot reach it.

pub mod rand;

use crate::geom2::Point;

/// Insertion-ordered set of unique planar points.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw coordinates, silently skipping duplicates and
    /// non-finite pairs.
    pub fn from_coords<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut set = Self::new();
        for (x, y) in coords {
            set.add_point(x, y);
        }
        set
    }

    /// Append `(x, y)`; returns `false` if the exact coordinates already exist
    /// or either coordinate is not finite.
    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        if self.points.iter().any(|p| p.x == x && p.y == y) {
            return false;
        }
        let id = self.points.len();
        self.points.push(Point::new(x, y, id));
        true
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, id: usize) -> Option<&Point> {
        self.points.get(id)
    }

    /// Remove all points; ids restart at 0.
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Owned copy of the current points for a trace to consume.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            points: self.points.clone(),
        }
    }
}

/// Immutable, owned copy of a `PointSet` (same points, ids and order).
///
/// `Clone` produces another independent copy, which is how dual playback gives
/// each algorithm its own input.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Snapshot {
    points: Vec<Point>,
}

impl Snapshot {
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub(crate) fn into_points(self) -> Vec<Point> {
        self.points
    }
}
