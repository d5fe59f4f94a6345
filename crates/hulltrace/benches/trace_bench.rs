//! Criterion benches for draining hull traces.
//!
//! - Jarvis and Graham over disk scatters of 16, 64 and 256 points
//!   (unsnapped, so no duplicates are dropped).
//! - Dual lockstep with a no-op scheduler wait.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hulltrace::api::{
    draw_scatter, run_to_end, Algorithm, DualPlaybackController, GeomCfg, ManualScheduler,
    NullSink, PlaybackCfg, ScatterCfg, ScatterRegion, ScatterReplay,
};

const SIZES: [usize; 3] = [16, 64, 256];

fn scatter_cfg(count: usize) -> ScatterCfg {
    ScatterCfg {
        count,
        region: ScatterRegion::Disk { radius: 100.0 },
        snap_to_grid: false,
    }
}

fn bench_traces(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace");
    for algo in [Algorithm::JarvisMarch, Algorithm::GrahamScan] {
        let name = match algo {
            Algorithm::JarvisMarch => "jarvis",
            Algorithm::GrahamScan => "graham",
        };
        for n in SIZES {
            group.bench_function(BenchmarkId::new(name, n), |b| {
                b.iter_batched(
                    || draw_scatter(scatter_cfg(n), ScatterReplay::new(42, n as u64)).snapshot(),
                    |snap| {
                        let mut trace = algo.trace(snap, GeomCfg::default());
                        let _ = run_to_end(trace.as_mut());
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_dual(c: &mut Criterion) {
    let mut group = c.benchmark_group("dual");
    for n in SIZES {
        group.bench_function(BenchmarkId::new("lockstep", n), |b| {
            b.iter_batched(
                || draw_scatter(scatter_cfg(n), ScatterReplay::new(7, n as u64)),
                |points| {
                    let mut ctl = DualPlaybackController::new(
                        PlaybackCfg::default(),
                        ManualScheduler::new(),
                        NullSink,
                    )
                    .with_points(points);
                    let _ = ctl.start().and_then(|_| ctl.drive(|_| {}));
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_traces, bench_dual);
criterion_main!(benches);
