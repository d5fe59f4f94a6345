//! Compare Jarvis March and Graham Scan on a few seeded scatters.
//!
//! Usage:
//!   cargo run -p hulltrace --example compare_random -- 5
//!
//! Prints, per sample, the point count, both complexity lines and whether the
//! two hulls agree on their vertex set.

use hulltrace::api::{
    draw_scatter, DualPlaybackController, ManualScheduler, NullSink, PlaybackCfg, ScatterCfg,
    ScatterReplay,
};

fn main() {
    let samples: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);
    let cfg = ScatterCfg::default();
    for i in 0..samples {
        let points = draw_scatter(cfg, ScatterReplay::new(2025, i));
        let n = points.point_count();
        let mut ctl =
            DualPlaybackController::new(PlaybackCfg::default(), ManualScheduler::new(), NullSink)
                .with_points(points);
        if let Err(e) = ctl.start().and_then(|_| ctl.drive(|_| {})) {
            eprintln!("sample {i}: {e}");
            continue;
        }
        let Some(cmp) = ctl.comparison() else {
            eprintln!("sample {i}: no comparison");
            continue;
        };
        println!(
            "sample {i}: n={n}, agree={}\n{}",
            cmp.same_vertex_set(),
            cmp.summary()
        );
    }
}
