use super::kernel::orientation;
use super::types::{Grid, Point, Turn};

/// True if every consecutive (cyclic) triple of `hull` turns CCW or is collinear.
///
/// Polygons with fewer than 3 vertices are trivially convex.
pub fn is_convex_ccw(hull: &[Point], grid: &Grid) -> bool {
    let h = hull.len();
    if h < 3 {
        return true;
    }
    (0..h).all(|k| {
        let (t, _) = orientation(&hull[k], &hull[(k + 1) % h], &hull[(k + 2) % h], grid);
        t != Turn::Clockwise
    })
}

/// Closed containment test of `p` in a CCW hull (boundary counts as inside).
///
/// Degenerate hulls: a single point contains what snaps to its lattice node,
/// a segment contains the points lying on it.
pub fn hull_contains(hull: &[Point], p: &Point, grid: &Grid) -> bool {
    match hull.len() {
        0 => false,
        1 => grid.same_node(&hull[0], p),
        2 => on_segment(&hull[0], &hull[1], p, grid),
        h => (0..h).all(|k| {
            let (t, _) = orientation(&hull[k], &hull[(k + 1) % h], p, grid);
            t != Turn::Clockwise
        }),
    }
}

fn on_segment(a: &Point, b: &Point, p: &Point, grid: &Grid) -> bool {
    if orientation(a, b, p, grid).0 != Turn::Collinear {
        return false;
    }
    let (ka, kb, kp) = (grid.snap(a), grid.snap(b), grid.snap(p));
    let within = |lo: i64, hi: i64, v: i64| lo.min(hi) <= v && v <= lo.max(hi);
    within(ka.x, kb.x, kp.x) && within(ka.y, kb.y, kp.y)
}

/// Compare two vertex lists as sets, keyed by point id.
pub fn same_vertex_set(a: &[Point], b: &[Point]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut ia: Vec<usize> = a.iter().map(|p| p.id).collect();
    let mut ib: Vec<usize> = b.iter().map(|p| p.id).collect();
    ia.sort_unstable();
    ib.sort_unstable();
    ia == ib
}
