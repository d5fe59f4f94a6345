//! Stepwise convex hull traces with playback control.
//!
//! Jarvis March and Graham Scan are exposed as suspendable step producers
//! (`trace`), driven by a run / pause / single-step state machine
//! (`playback`) that a renderer observes through a `StepSink`.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - `api` is the curated import surface for the CLI and benches; breaking
//!   changes there are fine when they improve the design.

pub mod api;
pub mod geom2;
pub mod playback;
pub mod points;
pub mod trace;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom2::{GeomCfg, Grid, Point, Turn};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom2::{orientation, GeomCfg, Grid, Point, Turn};
    pub use crate::playback::{
        DualPlaybackController, ManualScheduler, NullSink, PlaybackCfg, PlaybackController,
        PlaybackState, StepSink,
    };
    pub use crate::points::rand::{draw_scatter, Region, ReplayToken, ScatterCfg};
    pub use crate::points::{PointSet, Snapshot};
    pub use crate::trace::{run_to_end, Algorithm, Finished, Hull, Step, Trace};
}
