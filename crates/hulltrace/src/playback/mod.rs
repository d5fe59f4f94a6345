//! Playback state machines over hull traces.
//!
//! Purpose
//! - `PlaybackController`: run / pause / resume / single-step / reset of one
//!   trace, pulling on a host-provided timer cadence.
//! - `DualPlaybackController`: the same for a Jarvis and a Graham trace in
//!   lockstep, ending in a side-by-side `Comparison`.
//!
//! Model
//! - Single-threaded and cooperative. A controller only pulls when called:
//!   `start`, `resume`, `single_step`, or `on_timer` for its pending timer.
//! - At most one timer is pending. Pause and reset revoke it; a revoked id that
//!   still reaches `on_timer` is ignored.
//! - A `TraceError` during a pull forces `reset` and is returned to the caller.
//!
//! Code cross-refs: `crate::trace::Trace`, `sched::ManualScheduler`

mod dual;
mod lane;
mod sched;
mod single;
mod types;

pub use dual::{Comparison, DualPlaybackController};
pub use sched::ManualScheduler;
pub use single::PlaybackController;
pub use types::{
    DualStepSink, NullSink, PlaybackCfg, PlaybackError, PlaybackState, PlaybackStatus, Scheduler,
    StepSink, TimerId, MIN_POINTS,
};

#[cfg(test)]
mod tests;
