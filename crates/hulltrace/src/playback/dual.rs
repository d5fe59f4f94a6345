//! Lockstep playback of a Jarvis and a Graham trace over the same input.
//!
//! Each lane owns its own copy of the snapshot. A tick pulls one step from
//! every unfinished lane; the pair finishes when both lanes have.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::geom2::GeomCfg;
use crate::points::PointSet;
use crate::trace::{Algorithm, Finished, GrahamTrace, JarvisTrace, Step, Trace, TraceError};

use super::lane::Lane;
use super::sched::ManualScheduler;
use super::types::{
    status_message, DualStepSink, PlaybackCfg, PlaybackError, PlaybackState, PlaybackStatus,
    Scheduler, TimerId, MIN_POINTS,
};

/// Side-by-side result of a dual run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    pub jarvis: Finished,
    pub graham: Finished,
    pub jarvis_steps: usize,
    pub graham_steps: usize,
}

impl Comparison {
    /// Both hulls have the same vertices (by id).
    pub fn same_vertex_set(&self) -> bool {
        self.jarvis.hull.same_vertex_set(&self.graham.hull)
    }

    /// One line per algorithm: complexity, compute time, wall-clock time and
    /// step count.
    pub fn summary(&self) -> String {
        let line = |fin: &Finished, steps: usize| {
            format!(
                "{} | {:.3} ms compute | {:.3} ms wall | {} steps",
                fin.complexity,
                fin.elapsed.as_secs_f64() * 1e3,
                fin.wall_clock.as_secs_f64() * 1e3,
                steps,
            )
        };
        format!(
            "{}\n{}",
            line(&self.jarvis, self.jarvis_steps),
            line(&self.graham, self.graham_steps)
        )
    }
}

/// Two-lane controller; every transition applies to both lanes at once.
pub struct DualPlaybackController<S: Scheduler, K: DualStepSink> {
    points: PointSet,
    cfg: PlaybackCfg,
    state: PlaybackState,
    /// Jarvis lane first, Graham lane second.
    lanes: Option<[Lane; 2]>,
    pending: Option<TimerId>,
    comparison: Option<Comparison>,
    scheduler: S,
    sink: K,
}

impl<S: Scheduler, K: DualStepSink> DualPlaybackController<S, K> {
    pub fn new(cfg: PlaybackCfg, scheduler: S, sink: K) -> Self {
        Self {
            points: PointSet::new(),
            cfg,
            state: PlaybackState::Idle,
            lanes: None,
            pending: None,
            comparison: None,
            scheduler,
            sink,
        }
    }

    pub fn with_points(mut self, points: PointSet) -> Self {
        self.points = points;
        self
    }

    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        self.points.add_point(x, y)
    }

    pub fn point_count(&self) -> usize {
        self.points.point_count()
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn cfg(&self) -> PlaybackCfg {
        self.cfg
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.cfg.delay = delay;
    }

    pub fn set_geom(&mut self, geom: GeomCfg) {
        self.cfg.geom = geom;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    /// Steps pulled so far, `(jarvis, graham)`.
    pub fn steps_pulled(&self) -> (usize, usize) {
        self.lanes
            .as_ref()
            .map_or((0, 0), |[j, g]| (j.pulled(), g.pulled()))
    }

    /// Finished payload of a lane, if that lane is done.
    pub fn lane_result(&self, algorithm: Algorithm) -> Option<&Finished> {
        self.lanes
            .as_ref()?
            .iter()
            .find(|l| l.algorithm() == algorithm)?
            .finished()
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn status(&self) -> PlaybackStatus {
        let (j, g) = self.steps_pulled();
        PlaybackStatus {
            state: self.state,
            algorithm: None,
            steps_pulled: j + g,
            point_count: self.points.point_count(),
            message: status_message(self.state, "Dual comparison", self.points.point_count()),
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

    /// Copy the snapshot once per lane, build both traces, run the first tick.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        self.check_startable()?;
        let have = self.points.point_count();
        if have < MIN_POINTS {
            return Err(PlaybackError::NotEnoughPoints {
                have,
                need: MIN_POINTS,
            });
        }
        let snapshot = self.points.snapshot();
        let geom = self.cfg.geom;
        self.begin(
            Box::new(JarvisTrace::new(snapshot.clone(), geom)),
            Box::new(GrahamTrace::new(snapshot, geom)),
        )
    }

    /// Start lockstep playback of two caller-built traces (no point-count
    /// check). They are reported as the Jarvis and Graham lanes respectively.
    pub fn start_with(
        &mut self,
        jarvis: Box<dyn Trace>,
        graham: Box<dyn Trace>,
    ) -> Result<(), PlaybackError> {
        self.check_startable()?;
        self.begin(jarvis, graham)
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Running {
            return Err(self.invalid("pause"));
        }
        self.cancel_pending();
        self.transition(PlaybackState::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Paused {
            return Err(self.invalid("resume"));
        }
        self.transition(PlaybackState::Running);
        self.tick()
    }

    pub fn toggle_pause(&mut self) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused => self.resume(),
            _ => Err(self.invalid("toggle pause")),
        }
    }

    /// One tick on both lanes while paused.
    pub fn single_step(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Paused {
            return Err(self.invalid("single-step"));
        }
        self.tick()
    }

    pub fn reset(&mut self) {
        self.cancel_pending();
        self.lanes = None;
        self.comparison = None;
        self.transition(PlaybackState::Idle);
    }

    pub fn clear(&mut self) {
        self.reset();
        self.points.reset();
    }

    pub fn on_timer(&mut self, id: TimerId) -> Result<(), PlaybackError> {
        if self.pending != Some(id) {
            return Ok(());
        }
        self.pending = None;
        if self.state != PlaybackState::Running {
            return Ok(());
        }
        self.tick()
    }

    fn check_startable(&self) -> Result<(), PlaybackError> {
        if matches!(self.state, PlaybackState::Running | PlaybackState::Paused) {
            return Err(self.invalid("start"));
        }
        Ok(())
    }

    fn begin(
        &mut self,
        jarvis: Box<dyn Trace>,
        graham: Box<dyn Trace>,
    ) -> Result<(), PlaybackError> {
        self.cancel_pending();
        self.comparison = None;
        self.lanes = Some([Lane::new(jarvis), Lane::new(graham)]);
        debug!(points = self.points.point_count(), "dual: start");
        self.transition(PlaybackState::Running);
        self.tick()
    }

    fn tick(&mut self) -> Result<(), PlaybackError> {
        let Some(lanes) = self.lanes.as_mut() else {
            return Ok(());
        };
        let mut failure = None;
        for lane in lanes.iter_mut() {
            if let Err(err) = Self::tick_lane(lane, &mut self.sink) {
                failure = Some(err);
                break;
            }
        }
        if let Some(err) = failure {
            warn!(error = %err, "dual: run aborted");
            self.reset();
            self.sink.on_abort(&err);
            return Err(err.into());
        }

        let [j, g] = &*lanes;
        match (j.finished(), g.finished()) {
            (Some(jf), Some(gf)) => {
                let comparison = Comparison {
                    jarvis: jf.clone(),
                    graham: gf.clone(),
                    jarvis_steps: j.pulled(),
                    graham_steps: g.pulled(),
                };
                info!(
                    same_vertex_set = comparison.same_vertex_set(),
                    jarvis_steps = comparison.jarvis_steps,
                    graham_steps = comparison.graham_steps,
                    "dual: finished"
                );
                self.cancel_pending();
                self.transition(PlaybackState::Finished);
                self.sink.on_comparison(&comparison);
                self.comparison = Some(comparison);
            }
            _ if self.state == PlaybackState::Running => {
                self.pending = Some(self.scheduler.schedule(self.cfg.delay));
            }
            _ => {}
        }
        Ok(())
    }

    fn tick_lane(lane: &mut Lane, sink: &mut K) -> Result<(), TraceError> {
        if let Some(done) = lane.finished() {
            sink.on_retained(done);
            return Ok(());
        }
        match lane.pull()? {
            Some(Step::Finished(fin)) => sink.on_lane_finished(&fin),
            Some(step) => sink.on_step(lane.algorithm(), &step),
            None => {}
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
            debug!(from = %self.state, to = %to, "dual: transition");
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

impl<K: DualStepSink> DualPlaybackController<ManualScheduler, K> {
    /// Fire queued timers until the pair finishes or nothing is scheduled.
    pub fn drive(&mut self, mut wait: impl FnMut(Duration)) -> Result<(), PlaybackError> {
        while let Some((id, delay)) = self.scheduler.pop_due() {
            wait(delay);
            self.on_timer(id)?;
        }
        Ok(())
    }
}
