//! Curated internal API (UNSTABLE).
//!
//! Important
//! - Not a public API. A convenience surface for the CLI, benches and demos.
//! - Prefer these re-exports over reaching into submodules.

// Geometry kernel
pub use crate::geom2::{
    distance_squared, hull_contains, is_convex_ccw, lowest_point_index, orientation,
    polar_compare, rank_cmp, same_vertex_set, GeomCfg, Grid, Point, Turn,
};
// Point sets and seeded scatters
pub use crate::points::rand::{
    draw_scatter, Region as ScatterRegion, ReplayToken as ScatterReplay, ScatterCfg,
};
pub use crate::points::{PointSet, Snapshot};
// Traces
pub use crate::trace::{
    run_to_end, Algorithm, Complexity, Finished, GrahamProbe, GrahamSorted, GrahamStatus,
    GrahamTrace, Hull, JarvisProbe, JarvisTrace, Step, Trace, TraceError,
};
// Playback
pub use crate::playback::{
    Comparison, DualPlaybackController, DualStepSink, ManualScheduler, NullSink, PlaybackCfg,
    PlaybackController, PlaybackError, PlaybackState, PlaybackStatus, Scheduler, StepSink,
    TimerId, MIN_POINTS,
};
