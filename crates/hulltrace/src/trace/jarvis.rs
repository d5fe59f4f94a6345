//! Jarvis March (gift wrapping) as a saved-state step producer.
//!
//! One `JarvisProbe` per inner-loop comparison; the hull grows by one vertex
//! per completed wrap and closes when the best candidate is the anchor again.
//! Each wrap seeds the candidate with the first index other than `p` and
//! compares it against the remaining `n - 2` points.

use tracing::{debug, info};

use crate::geom2::{
    distance_squared, lowest_point_index, orientation, rank_cmp, GeomCfg, Grid, Point, Turn,
};
use crate::points::Snapshot;

use super::types::{Algorithm, Complexity, Finished, Hull, JarvisProbe, Step, TraceError};
use super::{Stopwatch, Trace};

#[derive(Clone, Copy, Debug)]
enum Phase {
    Start,
    /// Scanning candidates around hull vertex `p`; `seed` is the wrap's first
    /// candidate and `next` the next index to test.
    Scan {
        anchor: usize,
        p: usize,
        seed: usize,
        q: usize,
        next: usize,
    },
    Done,
}

/// Stepwise Jarvis March over an owned snapshot.
#[derive(Clone, Debug)]
pub struct JarvisTrace {
    points: Vec<Point>,
    grid: Grid,
    clock: Stopwatch,
    hull: Vec<Point>,
    phase: Phase,
}

impl JarvisTrace {
    pub fn new(snapshot: Snapshot, cfg: GeomCfg) -> Self {
        let points = snapshot.into_points();
        Self {
            grid: cfg.grid_for(&points),
            points,
            clock: Stopwatch::default(),
            hull: Vec::new(),
            phase: Phase::Start,
        }
    }

    /// Hull accumulated so far (anchor first).
    pub fn hull_so_far(&self) -> &[Point] {
        &self.hull
    }

    fn advance(&mut self) -> Result<Option<Step>, TraceError> {
        let n = self.points.len();
        loop {
            match self.phase {
                Phase::Start => match lowest_point_index(&self.points, &self.grid) {
                    Some(anchor) if n >= 3 => {
                        debug!(n, anchor = self.points[anchor].id, "jarvis: anchor");
                        self.hull.push(self.points[anchor]);
                        self.phase = Self::wrap(anchor, anchor);
                    }
                    _ => return Ok(Some(self.finish())),
                },
                Phase::Scan {
                    anchor,
                    p,
                    seed,
                    q,
                    next,
                } => {
                    let mut next = next;
                    while next == p || next == seed {
                        next += 1;
                    }
                    if next >= n {
                        // Wrap complete: q is the next hull vertex. A candidate
                        // on p's own lattice node means every point shares it.
                        let (pp, qq) = (&self.points[p], &self.points[q]);
                        if q == anchor || self.grid.same_node(pp, qq) {
                            return Ok(Some(self.finish()));
                        }
                        if self.hull.len() >= n {
                            return Err(TraceError::NonTerminating {
                                algorithm: Algorithm::JarvisMarch,
                                vertices: self.hull.len() + 1,
                                n,
                            });
                        }
                        self.hull.push(self.points[q]);
                        self.phase = Self::wrap(anchor, q);
                        continue;
                    }
                    let (q_new, probe) = self.probe(p, q, next);
                    self.phase = Phase::Scan {
                        anchor,
                        p,
                        seed,
                        q: q_new,
                        next: next + 1,
                    };
                    return Ok(Some(Step::JarvisProbe(probe)));
                }
                Phase::Done => return Ok(None),
            }
        }
    }

    /// Fresh wrap around `p`, seeded with the first other index.
    fn wrap(anchor: usize, p: usize) -> Phase {
        let seed = usize::from(p == 0);
        Phase::Scan {
            anchor,
            p,
            seed,
            q: seed,
            next: 0,
        }
    }

    /// Compare candidate `i` against the current best `q` around `p`.
    fn probe(&self, p: usize, q: usize, i: usize) -> (usize, JarvisProbe) {
        let (pp, qq, ii) = (&self.points[p], &self.points[q], &self.points[i]);
        let (turn, val) = orientation(pp, qq, ii, &self.grid);
        let mut narrative = format!(
            "P: {pp}, Q (best): {qq}, I (test): {ii}\n\n\
             Checking orientation of (P, Q, I).\nResult: {val:.1}\n\n"
        );
        let q_new = match turn {
            Turn::Clockwise => {
                narrative.push_str(
                    "Result is negative -> clockwise.\nI lies outside edge P->Q. New Q = I.",
                );
                i
            }
            Turn::Collinear => {
                narrative.push_str("Result is zero -> collinear.\n");
                // Equal distance means the same lattice node; the lowest-ranked
                // point represents it, whatever the insertion order.
                let (di, dq) = (
                    distance_squared(pp, ii, &self.grid),
                    distance_squared(pp, qq, &self.grid),
                );
                if di > dq {
                    narrative.push_str("I is farther than Q. New Q = I.");
                    i
                } else if di == dq && rank_cmp(ii, qq, &self.grid).is_lt() {
                    narrative.push_str("I coincides with Q and ranks lower. New Q = I.");
                    i
                } else {
                    narrative.push_str("Q is farther or ranks lower. Q remains.");
                    q
                }
            }
            Turn::CounterClockwise => {
                narrative.push_str(
                    "Result is positive -> counter-clockwise.\nQ remains the best candidate.",
                );
                q
            }
        };
        let probe = JarvisProbe {
            p: *pp,
            q_candidate: self.points[q_new],
            i_tested: *ii,
            turn,
            signed_area: val,
            hull_so_far: self.hull.clone(),
            narrative,
        };
        (q_new, probe)
    }

    fn finish(&mut self) -> Step {
        self.phase = Phase::Done;
        let n = self.points.len();
        let hull = if n < 3 {
            Hull::default()
        } else {
            Hull::new(std::mem::take(&mut self.hull))
        };
        let h = hull.len();
        let finished = Finished {
            algorithm: Algorithm::JarvisMarch,
            hull,
            elapsed: self.clock.elapsed(),
            wall_clock: self.clock.wall(),
            complexity: Complexity::JarvisMarch { n, h },
        };
        info!(n, h, elapsed = ?finished.elapsed, "jarvis: finished");
        Step::Finished(finished)
    }
}

impl Trace for JarvisTrace {
    fn algorithm(&self) -> Algorithm {
        Algorithm::JarvisMarch
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
