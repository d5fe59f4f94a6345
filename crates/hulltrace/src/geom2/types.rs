//! Basic 2D types and tolerances shared by both hull algorithms.
//!
//! - `GeomCfg`: centralizes the collinearity epsilon. Both traces of a dual run
//!   must be built from the same value, otherwise their hulls are not comparable.
//! - `Grid`: the lattice a point set is snapped to. Every predicate is exact
//!   integer arithmetic on lattice coordinates, so "collinear" is the same
//!   verdict whichever vertex of a triple it is evaluated from.
//! - `Point`: fixed-field planar point with a stable insertion id.
//! - `Turn`: three-way orientation of an ordered triple.
//!
//! Code cross-refs: `kernel::{orientation, polar_compare}`, `crate::points::PointSet`

use nalgebra::Vector2;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeomCfg {
    /// Relative collinearity tolerance. Coordinates are snapped to a lattice
    /// of spacing `eps_collinear * max(1, max |coord|)` (rounded down to a
    /// power of two), clamped to `[f64::EPSILON, 1]`.
    pub eps_collinear: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_collinear: 1e-9,
        }
    }
}

impl GeomCfg {
    /// Lattice for `points`. Equal inputs always give equal grids, so two
    /// traces over copies of one snapshot agree on every predicate.
    pub fn grid_for(&self, points: &[Point]) -> Grid {
        let eps = if self.eps_collinear.is_finite() {
            self.eps_collinear.abs().clamp(f64::EPSILON, 1.0)
        } else {
            f64::EPSILON
        };
        let magnitude = points
            .iter()
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(1.0_f64, f64::max);
        // Power-of-two spacing keeps integer and dyadic inputs exact.
        let step = (eps * magnitude).log2().floor().exp2();
        Grid { step }
    }
}

/// Snapping lattice with spacing `step`, anchored at the origin.
///
/// Lattice coordinates stay below `2^54` in magnitude, so cross products of
/// lattice differences fit in `i128` without overflow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    step: f64,
}

impl Grid {
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Lattice coordinates of `p`.
    #[inline]
    pub fn snap(&self, p: &Point) -> Vector2<i64> {
        (p.pos() / self.step).map(|c| c.round() as i64)
    }

    /// Both points fall on the same lattice node.
    #[inline]
    pub fn same_node(&self, a: &Point, b: &Point) -> bool {
        self.snap(a) == self.snap(b)
    }
}

/// Planar point with a stable identity.
///
/// `id` is the insertion index inside the owning `PointSet`. Copies made for
/// snapshots keep the id, so it is the only key that survives duplication.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub id: usize,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64, id: usize) -> Self {
        Self { x, y, id }
    }
    #[inline]
    pub fn pos(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Turn direction of an ordered triple `(p, q, r)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Collinear,
    Clockwise,
    CounterClockwise,
}

impl Turn {
    #[inline]
    pub fn is_ccw(self) -> bool {
        matches!(self, Turn::CounterClockwise)
    }
}

impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Turn::Collinear => "collinear",
            Turn::Clockwise => "clockwise",
            Turn::CounterClockwise => "counter-clockwise",
        };
        f.write_str(s)
    }
}
