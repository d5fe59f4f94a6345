//! Orientation predicate, squared distance and polar-angle comparator.
//!
//! Sign convention: a positive signed area means `r` lies to the left of the
//! directed line `p → q` (counter-clockwise turn). Everything downstream
//! (Jarvis replace rule, Graham pop rule, hull predicates) is written against
//! this convention.
//!
//! All predicates work on `Grid` lattice coordinates in `i128`, so they are
//! exact: the verdict for a triple does not depend on which vertex is `p`,
//! and `polar_compare` is a total order.

use std::cmp::Ordering;

use nalgebra::Vector2;

use super::types::{Grid, Point, Turn};

#[inline]
fn lattice_delta(a: &Point, b: &Point, grid: &Grid) -> Vector2<i128> {
    (grid.snap(b) - grid.snap(a)).map(i128::from)
}

#[inline]
fn cross(u: Vector2<i128>, v: Vector2<i128>) -> i128 {
    u.x * v.y - u.y * v.x
}

/// Orientation of the ordered triple `(p, q, r)` and its signed area
/// `(q.x−p.x)(r.y−p.y) − (q.y−p.y)(r.x−p.x)` measured on the lattice.
///
/// Points are snapped to `grid` first; a zero lattice area is `Collinear`.
pub fn orientation(p: &Point, q: &Point, r: &Point, grid: &Grid) -> (Turn, f64) {
    let area = cross(lattice_delta(p, q, grid), lattice_delta(p, r, grid));
    let turn = match area.cmp(&0) {
        Ordering::Greater => Turn::CounterClockwise,
        Ordering::Less => Turn::Clockwise,
        Ordering::Equal => Turn::Collinear,
    };
    (turn, area as f64 * grid.step() * grid.step())
}

/// Squared distance in lattice units. Only used to break collinear ties.
#[inline]
pub fn distance_squared(a: &Point, b: &Point, grid: &Grid) -> i128 {
    let d = lattice_delta(a, b, grid);
    d.x * d.x + d.y * d.y
}

/// Bottom-to-top order: lattice `y`, lattice `x`, then raw `y`, `x` and id.
///
/// Total over distinct points. The minimum is the lowest point and always a
/// hull vertex; both algorithms use this order to pick one representative
/// among points sharing a lattice node or a collinear tie.
pub fn rank_cmp(a: &Point, b: &Point, grid: &Grid) -> Ordering {
    let (ka, kb) = (grid.snap(a), grid.snap(b));
    ka.y.cmp(&kb.y)
        .then(ka.x.cmp(&kb.x))
        .then(a.y.total_cmp(&b.y))
        .then(a.x.total_cmp(&b.x))
        .then(a.id.cmp(&b.id))
}

/// 0 for the null vector, 1 for angles in `[0, π)`, 2 for `[π, 2π)`.
#[inline]
fn half_plane(v: Vector2<i128>) -> u8 {
    if v.x == 0 && v.y == 0 {
        0
    } else if v.y > 0 || (v.y == 0 && v.x > 0) {
        1
    } else {
        2
    }
}

/// Angular order around `pivot`: `a` before `b` when `(pivot, a, b)` turns
/// counter-clockwise; collinear pairs order nearer-first, then by `rank_cmp`.
///
/// Points on the pivot's lattice node sort first. The nearer member of a
/// collinear run is never a hull vertex; the Graham collapse pass removes it
/// after sorting.
pub fn polar_compare(pivot: &Point, a: &Point, b: &Point, grid: &Grid) -> Ordering {
    let (va, vb) = (lattice_delta(pivot, a, grid), lattice_delta(pivot, b, grid));
    half_plane(va)
        .cmp(&half_plane(vb))
        .then_with(|| cross(va, vb).cmp(&0).reverse())
        .then_with(|| distance_squared(pivot, a, grid).cmp(&distance_squared(pivot, b, grid)))
        .then_with(|| rank_cmp(a, b, grid))
}

/// Index of the lowest point under `rank_cmp`. Always a hull vertex.
pub fn lowest_point_index(points: &[Point], grid: &Grid) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| rank_cmp(a, b, grid))
        .map(|(i, _)| i)
}
