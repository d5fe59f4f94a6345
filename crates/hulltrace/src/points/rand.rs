//! Seeded random point scatters (replay tokens).
//!
//! Purpose
//! - Produce reproducible `PointSet`s for the CLI, property tests and benches.
//!   A `(seed, index)` token fully determines the draw.
//!
//! Model
//! - Sample `count` points uniformly in a disk or an axis-aligned box, optionally
//!   snapped to an integer grid (the interactive canvas places points on grid
//!   nodes). Snapped duplicates are dropped by `PointSet`, so the returned set
//!   may hold fewer than `count` points.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::PointSet;

/// Sampling region.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Uniform in the disk of this radius around the origin.
    Disk { radius: f64 },
    /// Uniform in `[-half_w, half_w] × [-half_h, half_h]`.
    Box { half_w: f64, half_h: f64 },
}

/// Scatter configuration.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterCfg {
    pub count: usize,
    pub region: Region,
    /// Round coordinates to the nearest integer.
    pub snap_to_grid: bool,
}

impl Default for ScatterCfg {
    fn default() -> Self {
        Self {
            count: 32,
            region: Region::Box {
                half_w: 20.0,
                half_h: 20.0,
            },
            snap_to_grid: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer over seed and index.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a point set. Same `(cfg, tok)` always yields the same set.
pub fn draw_scatter(cfg: ScatterCfg, tok: ReplayToken) -> PointSet {
    let mut rng = tok.to_std_rng();
    let mut set = PointSet::new();
    for _ in 0..cfg.count {
        let (mut x, mut y) = sample_region(&mut rng, cfg.region);
        if cfg.snap_to_grid {
            x = x.round();
            y = y.round();
        }
        set.add_point(x, y);
    }
    set
}

fn sample_region<R: Rng>(rng: &mut R, region: Region) -> (f64, f64) {
    match region {
        Region::Disk { radius } => {
            let r = radius.abs() * rng.gen::<f64>().sqrt();
            let th = rng.gen::<f64>() * std::f64::consts::TAU;
            (r * th.cos(), r * th.sin())
        }
        Region::Box { half_w, half_h } => {
            let x = (rng.gen::<f64>() * 2.0 - 1.0) * half_w.abs();
            let y = (rng.gen::<f64>() * 2.0 - 1.0) * half_h.abs();
            (x, y)
        }
    }
}
