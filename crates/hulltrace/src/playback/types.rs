//! Playback states, configuration, errors and the collaborator seams.

use std::time::Duration;

use thiserror::Error;

use crate::geom2::GeomCfg;
use crate::trace::{Algorithm, Finished, Step, TraceError};

use super::dual::Comparison;

/// Minimum number of points before `start` is accepted.
pub const MIN_POINTS: usize = 3;

/// Current state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackState {
    /// No trace; waiting for `start`.
    Idle,
    /// Pulling steps on the scheduler's cadence.
    Running,
    /// Trace kept, no pulls except `single_step`.
    Paused,
    /// Terminal step pulled.
    Finished,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Running => "running",
            PlaybackState::Paused => "paused",
            PlaybackState::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// Playback configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackCfg {
    /// Delay between two scheduled pulls.
    pub delay: Duration,
    /// Shared by every trace a controller builds.
    pub geom: GeomCfg,
}

impl Default for PlaybackCfg {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(350),
            geom: GeomCfg::default(),
        }
    }
}

/// Handle for one scheduled pull.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Host timer service (an event loop's `after`/`cancel` pair).
///
/// When a scheduled timer fires the host calls the controller's `on_timer`
/// with the same id. After `cancel` the host may still deliver the id; the
/// controller ignores it.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

/// Rendering side of single playback. Receives read-only steps.
pub trait StepSink {
    fn on_step(&mut self, step: &Step);
    fn on_finished(&mut self, _finished: &Finished) {}
    fn on_abort(&mut self, _err: &TraceError) {}
}

/// Rendering side of dual playback.
pub trait DualStepSink {
    fn on_step(&mut self, algorithm: Algorithm, step: &Step);
    /// A lane finished on this tick.
    fn on_lane_finished(&mut self, _finished: &Finished) {}
    /// A lane finished on an earlier tick; its hull stays on screen.
    fn on_retained(&mut self, _finished: &Finished) {}
    fn on_comparison(&mut self, _comparison: &Comparison) {}
    fn on_abort(&mut self, _err: &TraceError) {}
}

/// Sink that drops everything (headless runs and benches).
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl StepSink for NullSink {
    fn on_step(&mut self, _step: &Step) {}
}

impl DualStepSink for NullSink {
    fn on_step(&mut self, _algorithm: Algorithm, _step: &Step) {}
}

/// Controller errors. State is unchanged except for `Trace`, which has
/// already forced the controller back to `Idle`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("need at least {need} points to start, have {have}")]
    NotEnoughPoints { have: usize, need: usize },
    #[error("cannot {op} while {from}")]
    InvalidTransition {
        op: &'static str,
        from: PlaybackState,
    },
    #[error("run aborted: {0}")]
    Trace(#[from] TraceError),
}

/// Status snapshot for a status bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub algorithm: Option<Algorithm>,
    pub steps_pulled: usize,
    pub point_count: usize,
    pub message: String,
}

pub(crate) fn status_message(state: PlaybackState, label: &str, point_count: usize) -> String {
    match state {
        PlaybackState::Running => format!("{label} is running..."),
        PlaybackState::Paused => "Animation paused.".to_string(),
        PlaybackState::Finished => "Convex hull complete!".to_string(),
        PlaybackState::Idle if point_count < MIN_POINTS => {
            format!("Add {} more point(s).", MIN_POINTS - point_count)
        }
        PlaybackState::Idle => "Ready to visualize.".to_string(),
    }
}
