//! Suspendable hull algorithms that expose their progress step by step.
//!
//! Purpose
//! - Turn Jarvis March and Graham Scan into saved-state producers: each call
//!   to `Trace::pull` advances the algorithm by exactly one observable step.
//! - A trace owns its `Snapshot`; it cannot observe later edits to the
//!   `PointSet` it was taken from.
//!
//! Contract
//! - Steps are strictly ordered; the last one is always `Step::Finished`.
//! - Pulling is destructive. After `Finished`, `pull` returns `Ok(None)`.
//!   Re-running means building a new trace from a snapshot.
//!
//! Code cross-refs: `crate::playback::{PlaybackController, DualPlaybackController}`

mod graham;
mod jarvis;
mod types;

use std::time::{Duration, Instant};

pub use graham::GrahamTrace;
pub use jarvis::JarvisTrace;
pub use types::{
    Algorithm, Complexity, Finished, GrahamProbe, GrahamSorted, GrahamStatus, Hull, JarvisProbe,
    Step, TraceError,
};

use crate::geom2::GeomCfg;
use crate::points::Snapshot;

/// Lazy, non-restartable sequence of algorithm steps.
pub trait Trace {
    fn algorithm(&self) -> Algorithm;

    /// Advance by one step. `Ok(None)` once the terminal step has been taken.
    fn pull(&mut self) -> Result<Option<Step>, TraceError>;

    /// True once `Finished` has been pulled.
    fn is_exhausted(&self) -> bool;
}

impl Algorithm {
    /// Fresh trace of this algorithm over `snapshot`.
    pub fn trace(self, snapshot: Snapshot, cfg: GeomCfg) -> Box<dyn Trace> {
        match self {
            Algorithm::JarvisMarch => Box::new(JarvisTrace::new(snapshot, cfg)),
            Algorithm::GrahamScan => Box::new(GrahamTrace::new(snapshot, cfg)),
        }
    }
}

/// Pull every remaining step.
pub fn run_to_end<T: Trace + ?Sized>(trace: &mut T) -> Result<Vec<Step>, TraceError> {
    let mut steps = Vec::new();
    while let Some(step) = trace.pull()? {
        steps.push(step);
    }
    Ok(steps)
}

/// Accumulates time spent inside `pull`, so controller idle time between
/// scheduled pulls does not count towards `Finished::elapsed`. The first
/// `resume` also starts the wall clock behind `Finished::wall_clock`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Stopwatch {
    total: Duration,
    running_since: Option<Instant>,
    started: Option<Instant>,
}

impl Stopwatch {
    pub(crate) fn resume(&mut self) {
        let now = Instant::now();
        if self.started.is_none() {
            self.started = Some(now);
        }
        self.running_since = Some(now);
    }
    pub(crate) fn suspend(&mut self) {
        if let Some(t0) = self.running_since.take() {
            self.total += t0.elapsed();
        }
    }
    /// Accumulated time, including the pull in progress.
    pub(crate) fn elapsed(&self) -> Duration {
        self.total + self.running_since.map_or(Duration::ZERO, |t0| t0.elapsed())
    }
    /// Time since the first `resume`, never less than `elapsed`.
    pub(crate) fn wall(&self) -> Duration {
        let compute = self.elapsed();
        self.started.map_or(compute, |t0| t0.elapsed().max(compute))
    }
}
