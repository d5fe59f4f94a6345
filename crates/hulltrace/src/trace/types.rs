//! Step schema consumed by renderers, plus hull and error types.
//!
//! Steps are plain owned values. Sinks only ever receive `&Step`, so nothing a
//! renderer does can reach back into a running trace.

use std::time::Duration;

use thiserror::Error;

use crate::geom2::{hull_contains, is_convex_ccw, same_vertex_set, Grid, Point, Turn};

/// Which hull algorithm produced a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    JarvisMarch,
    GrahamScan,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::JarvisMarch => f.write_str("Jarvis March"),
            Algorithm::GrahamScan => f.write_str("Graham Scan"),
        }
    }
}

/// Convex hull vertices in counter-clockwise order.
///
/// Empty for fewer than 3 input points, 1–2 vertices for collinear input.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Hull {
    vertices: Vec<Point>,
}

impl Hull {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
    /// Fewer than 3 vertices (no polygon area).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }
    pub fn ids(&self) -> Vec<usize> {
        self.vertices.iter().map(|p| p.id).collect()
    }
    pub fn is_convex(&self, grid: &Grid) -> bool {
        is_convex_ccw(&self.vertices, grid)
    }
    pub fn contains(&self, p: &Point, grid: &Grid) -> bool {
        hull_contains(&self.vertices, p, grid)
    }
    /// Same vertices (by id) regardless of starting vertex.
    pub fn same_vertex_set(&self, other: &Hull) -> bool {
        same_vertex_set(&self.vertices, &other.vertices)
    }
}

/// Asymptotic cost annotation attached to a finished trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Complexity {
    /// `O(n·h)`.
    JarvisMarch { n: usize, h: usize },
    /// `O(n log n)`, dominated by the angular sort.
    GrahamScan { n: usize, h: usize },
}

impl Complexity {
    pub fn big_o(&self) -> &'static str {
        match self {
            Complexity::JarvisMarch { .. } => "O(n·h)",
            Complexity::GrahamScan { .. } => "O(n log n)",
        }
    }

    /// Operation estimate from the annotation's formula.
    pub fn estimated_ops(&self) -> f64 {
        match *self {
            Complexity::JarvisMarch { n, h } => (n * h) as f64,
            Complexity::GrahamScan { n, .. } => n as f64 * log2_or_zero(n),
        }
    }
}

fn log2_or_zero(n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        (n as f64).log2()
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Complexity::JarvisMarch { n, h } => write!(
                f,
                "Jarvis March: {} = {} * {} = {} ops",
                self.big_o(),
                n,
                h,
                n * h
            ),
            Complexity::GrahamScan { n, .. } => write!(
                f,
                "Graham Scan: {} = {} * {:.1} ops (for sorting)",
                self.big_o(),
                n,
                log2_or_zero(n)
            ),
        }
    }
}

/// One inner-loop comparison of Jarvis March.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JarvisProbe {
    /// Current hull vertex.
    pub p: Point,
    /// Best candidate after this comparison.
    pub q_candidate: Point,
    /// Candidate tested in this comparison.
    pub i_tested: Point,
    /// Orientation of `(p, q_before, i)` that drove the decision.
    pub turn: Turn,
    pub signed_area: f64,
    pub hull_so_far: Vec<Point>,
    pub narrative: String,
}

/// Graham Scan's pivot plus angular ordering (emitted once, after sorting).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrahamSorted {
    pub pivot: Point,
    /// Pivot first, then every other point in angular order (before collapse).
    pub angular_order: Vec<Point>,
    /// Nearer members of collinear runs, removed before the scan.
    pub discarded: Vec<Point>,
    pub narrative: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GrahamStatus {
    Checking,
    Popping,
    Pushing,
}

impl std::fmt::Display for GrahamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrahamStatus::Checking => f.write_str("checking"),
            GrahamStatus::Popping => f.write_str("popping"),
            GrahamStatus::Pushing => f.write_str("pushing"),
        }
    }
}

/// One stack operation of Graham Scan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrahamProbe {
    pub status: GrahamStatus,
    pub pivot: Point,
    /// Stack contents after the operation.
    pub stack: Vec<Point>,
    pub tested_point: Point,
    pub narrative: String,
}

/// Terminal step of every trace.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Finished {
    pub algorithm: Algorithm,
    pub hull: Hull,
    /// Compute time spent inside `pull`, excluding idle time between pulls.
    pub elapsed: Duration,
    /// Time from the first `pull` to this step, idle time included.
    pub wall_clock: Duration,
    pub complexity: Complexity,
}

/// A single observable algorithm state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum Step {
    JarvisProbe(JarvisProbe),
    GrahamSorted(GrahamSorted),
    GrahamProbe(GrahamProbe),
    Finished(Finished),
}

impl Step {
    pub fn is_finished(&self) -> bool {
        matches!(self, Step::Finished(_))
    }

    pub fn as_finished(&self) -> Option<&Finished> {
        match self {
            Step::Finished(f) => Some(f),
            _ => None,
        }
    }

    /// Human-readable description; `None` for the terminal step.
    pub fn narrative(&self) -> Option<&str> {
        match self {
            Step::JarvisProbe(s) => Some(&s.narrative),
            Step::GrahamSorted(s) => Some(&s.narrative),
            Step::GrahamProbe(s) => Some(&s.narrative),
            Step::Finished(_) => None,
        }
    }
}

/// Fatal trace failure. A run that hits one is aborted, never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TraceError {
    #[error("{algorithm}: hull did not close after {vertices} vertices on {n} points")]
    NonTerminating {
        algorithm: Algorithm,
        vertices: usize,
        n: usize,
    },
    #[error("{algorithm}: {reason}")]
    Aborted {
        algorithm: Algorithm,
        reason: String,
    },
}
