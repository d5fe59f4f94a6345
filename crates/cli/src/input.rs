//! Point sources for the CLI: a JSON file or a seeded scatter.

use anyhow::{Context, Result};
use hulltrace::api::{draw_scatter, PointSet, ScatterCfg, ScatterReplay};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a run's points come from.
#[derive(Clone, Debug)]
pub enum Source {
    File(PathBuf),
    Random { count: usize, seed: u64 },
}

/// One entry of a points file: `[x, y]` or `{"x": .., "y": ..}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Pair([f64; 2]),
    Object { x: f64, y: f64 },
}

impl RawPoint {
    fn xy(&self) -> (f64, f64) {
        match *self {
            RawPoint::Pair([x, y]) => (x, y),
            RawPoint::Object { x, y } => (x, y),
        }
    }
}

pub fn load(source: &Source) -> Result<PointSet> {
    match source {
        Source::File(path) => load_file(path),
        Source::Random { count, seed } => {
            let cfg = ScatterCfg {
                count: *count,
                ..ScatterCfg::default()
            };
            Ok(draw_scatter(cfg, ScatterReplay::new(*seed, 0)))
        }
    }
}

fn load_file(path: &Path) -> Result<PointSet> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading points {}", path.display()))?;
    parse_points(&text).with_context(|| format!("parsing points {}", path.display()))
}

/// Parse a JSON points array. Exact duplicates are skipped with a warning.
pub fn parse_points(text: &str) -> Result<PointSet> {
    let raw: Vec<RawPoint> = serde_json::from_str(text)?;
    let mut set = PointSet::new();
    let mut skipped = 0usize;
    for p in &raw {
        let (x, y) = p.xy();
        if !set.add_point(x, y) {
            skipped += 1;
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, kept = set.point_count(), "dropped duplicate points");
    }
    Ok(set)
}
