//! Single-trace playback controller.

use std::time::Duration;

use tracing::{debug, warn};

use crate::geom2::GeomCfg;
use crate::points::PointSet;
use crate::trace::{Algorithm, Finished, Step, Trace};

use super::lane::Lane;
use super::sched::ManualScheduler;
use super::types::{
    status_message, PlaybackCfg, PlaybackError, PlaybackState, PlaybackStatus, Scheduler,
    StepSink, TimerId, MIN_POINTS,
};

/// Drives one trace: `Idle → Running ⇄ Paused → Finished`, `reset` to `Idle`.
///
/// Owns the point set the traces are built from. Every `start` snapshots the
/// set, so points added mid-run only affect the next run.
pub struct PlaybackController<S: Scheduler, K: StepSink> {
    points: PointSet,
    algorithm: Algorithm,
    cfg: PlaybackCfg,
    state: PlaybackState,
    lane: Option<Lane>,
    pending: Option<TimerId>,
    last_finished: Option<Finished>,
    scheduler: S,
    sink: K,
}

impl<S: Scheduler, K: StepSink> PlaybackController<S, K> {
    pub fn new(algorithm: Algorithm, cfg: PlaybackCfg, scheduler: S, sink: K) -> Self {
        Self {
            points: PointSet::new(),
            algorithm,
            cfg,
            state: PlaybackState::Idle,
            lane: None,
            pending: None,
            last_finished: None,
            scheduler,
            sink,
        }
    }

    /// Replace the point set. Same rules as `add_point`: the running trace
    /// keeps its own snapshot.
    pub fn with_points(mut self, points: PointSet) -> Self {
        self.points = points;
        self
    }

    // --- input contract ---

    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        self.points.add_point(x, y)
    }

    pub fn point_count(&self) -> usize {
        self.points.point_count()
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    // --- configuration ---

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Choose the algorithm for the next `start`. Rejected mid-run.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<(), PlaybackError> {
        if self.is_active() {
            return Err(PlaybackError::InvalidTransition {
                op: "change algorithm",
                from: self.state,
            });
        }
        self.algorithm = algorithm;
        Ok(())
    }

    pub fn cfg(&self) -> PlaybackCfg {
        self.cfg
    }

    /// Takes effect from the next scheduled pull.
    pub fn set_delay(&mut self, delay: Duration) {
        self.cfg.delay = delay;
    }

    /// Takes effect from the next `start`.
    pub fn set_geom(&mut self, geom: GeomCfg) {
        self.cfg.geom = geom;
    }

    // --- state ---

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn can_start(&self) -> bool {
        !self.is_active() && self.points.point_count() >= MIN_POINTS
    }

    /// Result of the last completed run (cleared by `reset`).
    pub fn last_finished(&self) -> Option<&Finished> {
        self.last_finished.as_ref()
    }

    pub fn steps_pulled(&self) -> usize {
        self.lane.as_ref().map_or(0, Lane::pulled)
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn status(&self) -> PlaybackStatus {
        let running = self.lane.as_ref().map(Lane::algorithm);
        let label = running.unwrap_or(self.algorithm).to_string();
        PlaybackStatus {
            state: self.state,
            algorithm: running,
            steps_pulled: self.steps_pulled(),
            point_count: self.points.point_count(),
            message: status_message(self.state, &label, self.points.point_count()),
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    // --- transitions ---

    /// Snapshot the points, build a fresh trace and pull its first step.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        self.check_startable()?;
        let have = self.points.point_count();
        if have < MIN_POINTS {
            return Err(PlaybackError::NotEnoughPoints {
                have,
                need: MIN_POINTS,
            });
        }
        let trace = self.algorithm.trace(self.points.snapshot(), self.cfg.geom);
        self.begin(trace)
    }

    /// Start playback of a caller-built trace (no point-count check).
    pub fn start_with(&mut self, trace: Box<dyn Trace>) -> Result<(), PlaybackError> {
        self.check_startable()?;
        self.begin(trace)
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Running {
            return Err(self.invalid("pause"));
        }
        self.cancel_pending();
        self.transition(PlaybackState::Paused);
        Ok(())
    }

    /// Back to `Running`; pulls the next step right away.
    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Paused {
            return Err(self.invalid("resume"));
        }
        self.transition(PlaybackState::Running);
        self.pull_once()
    }

    pub fn toggle_pause(&mut self) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused => self.resume(),
            _ => Err(self.invalid("toggle pause")),
        }
    }

    /// Pull exactly one step while paused.
    pub fn single_step(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Paused {
            return Err(self.invalid("single-step"));
        }
        self.pull_once()
    }

    /// Drop the trace and any pending pull; points are kept.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.lane = None;
        self.last_finished = None;
        self.transition(PlaybackState::Idle);
    }

    /// `reset` and forget all points.
    pub fn clear(&mut self) {
        self.reset();
        self.points.reset();
    }

    /// Timer callback from the host. Stale or revoked ids are ignored.
    pub fn on_timer(&mut self, id: TimerId) -> Result<(), PlaybackError> {
        if self.pending != Some(id) {
            return Ok(());
        }
        self.pending = None;
        if self.state != PlaybackState::Running {
            return Ok(());
        }
        self.pull_once()
    }

    fn is_active(&self) -> bool {
        matches!(self.state, PlaybackState::Running | PlaybackState::Paused)
    }

    fn check_startable(&self) -> Result<(), PlaybackError> {
        if self.is_active() {
            return Err(self.invalid("start"));
        }
        Ok(())
    }

    fn begin(&mut self, trace: Box<dyn Trace>) -> Result<(), PlaybackError> {
        self.cancel_pending();
        self.last_finished = None;
        debug!(
            algorithm = %trace.algorithm(),
            points = self.points.point_count(),
            "playback: start"
        );
        self.lane = Some(Lane::new(trace));
        self.transition(PlaybackState::Running);
        self.pull_once()
    }

    fn pull_once(&mut self) -> Result<(), PlaybackError> {
        let Some(lane) = self.lane.as_mut() else {
            return Ok(());
        };
        match lane.pull() {
            Ok(Some(Step::Finished(fin))) => {
                self.cancel_pending();
                self.transition(PlaybackState::Finished);
                self.sink.on_finished(&fin);
                self.last_finished = Some(fin);
            }
            Ok(Some(step)) => {
                self.sink.on_step(&step);
                if self.state == PlaybackState::Running {
                    self.pending = Some(self.scheduler.schedule(self.cfg.delay));
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "playback: run aborted");
                self.reset();
                self.sink.on_abort(&err);
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    fn transition(&mut self, to: PlaybackState) {
        if self.state != to {
            debug!(from = %self.state, to = %to, "playback: transition");
            self.state = to;
        }
    }

    fn invalid(&self, op: &'static str) -> PlaybackError {
        PlaybackError::InvalidTransition {
            op,
            from: self.state,
        }
    }
}

impl<K: StepSink> PlaybackController<ManualScheduler, K> {
    /// Fire queued timers in order until nothing is scheduled, calling `wait`
    /// with each timer's delay first (`thread::sleep` for real time, a no-op
    /// in tests).
    pub fn drive(&mut self, mut wait: impl FnMut(Duration)) -> Result<(), PlaybackError> {
        while let Some((id, delay)) = self.scheduler.pop_due() {
            wait(delay);
            self.on_timer(id)?;
        }
        Ok(())
    }
}
