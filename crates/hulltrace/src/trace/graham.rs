//! Graham Scan as a saved-state step producer.
//!
//! Phases: pivot + angular sort + collinear collapse (one `GrahamSorted`
//! step), then one `GrahamProbe` per stack operation, then `Finished`.

use tracing::{debug, info};

use crate::geom2::{
    distance_squared, lowest_point_index, orientation, polar_compare, rank_cmp, GeomCfg, Grid,
    Point, Turn,
};
use crate::points::Snapshot;

use super::types::{
    Algorithm, Complexity, Finished, GrahamProbe, GrahamSorted, GrahamStatus, Hull, Step,
    TraceError,
};
use super::{Stopwatch, Trace};

#[derive(Clone, Copy, Debug)]
enum Phase {
    Start,
    /// Announce `order[k]` as the point under test.
    Check { k: usize },
    /// Pop until `order[k]` makes a left turn, then push it.
    Resolve { k: usize },
    Done,
}

/// Stepwise Graham Scan over an owned snapshot.
#[derive(Clone, Debug)]
pub struct GrahamTrace {
    points: Vec<Point>,
    grid: Grid,
    clock: Stopwatch,
    pivot: Option<Point>,
    /// Angular order after collinear collapse (pivot excluded).
    order: Vec<Point>,
    stack: Vec<Point>,
    phase: Phase,
}

/// Sort `others` around `pivot`, counter-clockwise, nearer first on ties.
pub(crate) fn angular_sort(pivot: &Point, others: &mut [Point], grid: &Grid) {
    others.sort_by(|a, b| polar_compare(pivot, a, b, grid));
}

/// Collapse each run of points collinear with `pivot` to its farthest member
/// (lowest rank among equally far ones). Points on the pivot's own lattice
/// node are all dropped.
///
/// `sorted` must be in `angular_sort` order around the lowest-ranked point,
/// so every collinear run lies on a single ray. Returns `(kept, discarded)`;
/// both keep the input order.
pub(crate) fn collapse_collinear(
    pivot: &Point,
    sorted: &[Point],
    grid: &Grid,
) -> (Vec<Point>, Vec<Point>) {
    let mates = sorted
        .iter()
        .take_while(|p| grid.same_node(pivot, p))
        .count();
    let mut kept = Vec::with_capacity(sorted.len() - mates);
    let mut discarded = sorted[..mates].to_vec();
    let mut i = mates;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len()
            && orientation(pivot, &sorted[i], &sorted[j], grid).0 == Turn::Collinear
        {
            j += 1;
        }
        let run = &sorted[i..j];
        let far = run
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                distance_squared(pivot, b, grid)
                    .cmp(&distance_squared(pivot, a, grid))
                    .then(rank_cmp(a, b, grid))
            })
            .map(|(k, _)| k)
            .unwrap_or(0);
        for (k, p) in run.iter().enumerate() {
            if k == far {
                kept.push(*p);
            } else {
                discarded.push(*p);
            }
        }
        i = j;
    }
    (kept, discarded)
}

impl GrahamTrace {
    pub fn new(snapshot: Snapshot, cfg: GeomCfg) -> Self {
        let points = snapshot.into_points();
        Self {
            grid: cfg.grid_for(&points),
            points,
            clock: Stopwatch::default(),
            pivot: None,
            order: Vec::new(),
            stack: Vec::new(),
            phase: Phase::Start,
        }
    }

    pub fn stack(&self) -> &[Point] {
        &self.stack
    }

    fn advance(&mut self) -> Result<Option<Step>, TraceError> {
        match self.phase {
            Phase::Start => Ok(Some(self.sort_step())),
            Phase::Check { k } => {
                let (Some(pivot), Some(c)) = (self.pivot, self.order.get(k).copied()) else {
                    return Ok(Some(self.finish()));
                };
                self.phase = Phase::Resolve { k };
                let narrative = match self.stack.last() {
                    Some(top) => format!("Checking point I: {c}\nAgainst stack top: {top}"),
                    None => format!("Checking point I: {c}"),
                };
                Ok(Some(self.probe(GrahamStatus::Checking, pivot, c, narrative)))
            }
            Phase::Resolve { k } => {
                let (Some(pivot), Some(c)) = (self.pivot, self.order.get(k).copied()) else {
                    return Err(TraceError::Aborted {
                        algorithm: Algorithm::GrahamScan,
                        reason: format!("no point at sorted position {k}"),
                    });
                };
                let len = self.stack.len();
                if len >= 2 {
                    let (below, top) = (self.stack[len - 2], self.stack[len - 1]);
                    let (turn, _) = orientation(&below, &top, &c, &self.grid);
                    if !turn.is_ccw() {
                        self.stack.pop();
                        let narrative = format!(
                            "{below} -> {top} -> {c} is not a left turn ({turn}).\n\
                             Popping {top} from stack."
                        );
                        return Ok(Some(self.probe(GrahamStatus::Popping, pivot, c, narrative)));
                    }
                }
                let narrative = match self.stack.last() {
                    Some(top) => format!("{top} -> {c} is a left turn.\nPushing {c} to stack."),
                    None => format!("Pushing {c} to stack."),
                };
                self.stack.push(c);
                self.phase = Phase::Check { k: k + 1 };
                Ok(Some(self.probe(GrahamStatus::Pushing, pivot, c, narrative)))
            }
            Phase::Done => Ok(None),
        }
    }

    /// Pivot selection, angular sort and collinear collapse.
    fn sort_step(&mut self) -> Step {
        let pivot_idx = match lowest_point_index(&self.points, &self.grid) {
            Some(i) if self.points.len() >= 3 => i,
            _ => return self.finish(),
        };
        let pivot = self.points[pivot_idx];
        let mut others: Vec<Point> = self
            .points
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pivot_idx)
            .map(|(_, p)| *p)
            .collect();
        angular_sort(&pivot, &mut others, &self.grid);
        let (kept, discarded) = collapse_collinear(&pivot, &others, &self.grid);
        debug!(
            pivot = pivot.id,
            kept = kept.len(),
            discarded = discarded.len(),
            "graham: sorted"
        );

        let mut angular_order = Vec::with_capacity(others.len() + 1);
        angular_order.push(pivot);
        angular_order.extend_from_slice(&others);

        // Fewer than two kept points leaves a degenerate stack that the next
        // `Check` turns straight into the final hull.
        let seed = kept.len().min(2);
        self.stack = std::iter::once(pivot).chain(kept[..seed].iter().copied()).collect();
        self.pivot = Some(pivot);
        self.order = kept;
        self.phase = Phase::Check { k: seed };

        let mut narrative =
            format!("Found pivot P: {pivot}.\nSorted all other points by polar angle.");
        if !discarded.is_empty() {
            narrative.push_str(&format!(
                "\nDropped {} point(s) collinear with P in favour of the farthest.",
                discarded.len()
            ));
        }
        Step::GrahamSorted(GrahamSorted {
            pivot,
            angular_order,
            discarded,
            narrative,
        })
    }

    fn probe(&self, status: GrahamStatus, pivot: Point, c: Point, narrative: String) -> Step {
        Step::GrahamProbe(GrahamProbe {
            status,
            pivot,
            stack: self.stack.clone(),
            tested_point: c,
            narrative,
        })
    }

    fn finish(&mut self) -> Step {
        self.phase = Phase::Done;
        let n = self.points.len();
        let hull = if n < 3 {
            Hull::default()
        } else {
            Hull::new(std::mem::take(&mut self.stack))
        };
        let h = hull.len();
        let finished = Finished {
            algorithm: Algorithm::GrahamScan,
            hull,
            elapsed: self.clock.elapsed(),
            wall_clock: self.clock.wall(),
            complexity: Complexity::GrahamScan { n, h },
        };
        info!(n, h, elapsed = ?finished.elapsed, "graham: finished");
        Step::Finished(finished)
    }
}

impl Trace for GrahamTrace {
    fn algorithm(&self) -> Algorithm {
        Algorithm::GrahamScan
    }

    fn pull(&mut self) -> Result<Option<Step>, TraceError> {
        self.clock.resume();
        let out = self.advance();
        self.clock.suspend();
        if out.is_err() {
            self.phase = Phase::Done;
        }
        out
    }

    fn is_exhausted(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }
}
