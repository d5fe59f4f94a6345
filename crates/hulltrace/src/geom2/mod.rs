//! Planar geometry kernel for the hull traces.
//!
//! Purpose
//! - Provide the orientation predicate, squared distance and polar-angle
//!   comparator that both Jarvis March and Graham Scan are built on.
//! - Keep every tolerance in one `GeomCfg`, turned into one `Grid` per
//!   snapshot, so that two algorithms run on the same snapshot classify the
//!   same triples the same way.
//!
//! Code cross-refs: `crate::trace::{JarvisTrace, GrahamTrace}`, `crate::trace::Hull`

mod kernel;
mod types;
mod util;

pub use kernel::{distance_squared, lowest_point_index, orientation, polar_compare, rank_cmp};
pub use types::{GeomCfg, Grid, Point, Turn};
pub use util::{hull_contains, is_convex_ccw, same_vertex_set};
