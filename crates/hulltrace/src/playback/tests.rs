use super::*;
use crate::geom2::GeomCfg;
use crate::points::PointSet;
use crate::trace::{
    run_to_end, Algorithm, Finished, GrahamTrace, JarvisTrace, Step, Trace, TraceError,
};
use std::time::Duration;

const SQUARE_PLUS_CENTER: [(f64, f64); 5] =
    [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, 2.0)];

#[derive(Default)]
struct Recorder {
    steps: Vec<Step>,
    finished: Vec<Finished>,
    aborts: Vec<TraceError>,
}

impl StepSink for Recorder {
    fn on_step(&mut self, step: &Step) {
        self.steps.push(step.clone());
    }
    fn on_finished(&mut self, finished: &Finished) {
        self.finished.push(finished.clone());
    }
    fn on_abort(&mut self, err: &TraceError) {
        self.aborts.push(err.clone());
    }
}

#[derive(Default)]
struct DualRecorder {
    steps: Vec<(Algorithm, Step)>,
    lane_finished: Vec<Algorithm>,
    retained: usize,
    comparisons: Vec<Comparison>,
    aborts: Vec<TraceError>,
}

impl DualStepSink for DualRecorder {
    fn on_step(&mut self, algorithm: Algorithm, step: &Step) {
        self.steps.push((algorithm, step.clone()));
    }
    fn on_lane_finished(&mut self, finished: &Finished) {
        self.lane_finished.push(finished.algorithm);
    }
    fn on_retained(&mut self, _finished: &Finished) {
        self.retained += 1;
    }
    fn on_comparison(&mut self, comparison: &Comparison) {
        self.comparisons.push(comparison.clone());
    }
    fn on_abort(&mut self, err: &TraceError) {
        self.aborts.push(err.clone());
    }
}

type Ctl = PlaybackController<ManualScheduler, Recorder>;
type DualCtl = DualPlaybackController<ManualScheduler, DualRecorder>;

fn controller(algo: Algorithm, coords: &[(f64, f64)]) -> Ctl {
    PlaybackController::new(
        algo,
        PlaybackCfg::default(),
        ManualScheduler::new(),
        Recorder::default(),
    )
    .with_points(PointSet::from_coords(coords.iter().copied()))
}

fn dual(coords: &[(f64, f64)]) -> DualCtl {
    DualPlaybackController::new(
        PlaybackCfg::default(),
        ManualScheduler::new(),
        DualRecorder::default(),
    )
    .with_points(PointSet::from_coords(coords.iter().copied()))
}

fn standalone_len(algo: Algorithm, coords: &[(f64, f64)]) -> usize {
    let snap = PointSet::from_coords(coords.iter().copied()).snapshot();
    let mut trace = algo.trace(snap, GeomCfg::default());
    run_to_end(trace.as_mut()).unwrap().len()
}

/// Fire the pending timer, if any.
fn fire(ctl: &mut Ctl) {
    if let Some((id, _)) = ctl.scheduler_mut().pop_due() {
        ctl.on_timer(id).unwrap();
    }
}

#[test]
fn start_is_rejected_below_three_points() {
    let mut ctl = controller(Algorithm::JarvisMarch, &[(0.0, 0.0), (1.0, 0.0)]);
    assert!(!ctl.can_start());
    let err = ctl.start().unwrap_err();
    assert_eq!(err, PlaybackError::NotEnoughPoints { have: 2, need: 3 });
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert!(ctl.sink().steps.is_empty());
    assert_eq!(ctl.scheduler().pending(), 0);
    assert_eq!(ctl.status().message, "Add 1 more point(s).");
}

#[test]
fn start_pulls_first_step_and_schedules_next() {
    let mut ctl = controller(Algorithm::GrahamScan, &SQUARE_PLUS_CENTER);
    ctl.set_delay(Duration::from_millis(20));
    ctl.start().unwrap();
    assert_eq!(ctl.state(), PlaybackState::Running);
    assert_eq!(ctl.sink().steps.len(), 1);
    assert!(matches!(ctl.sink().steps[0], Step::GrahamSorted(_)));
    assert_eq!(ctl.scheduler().pending(), 1);
    assert_eq!(ctl.scheduler().peek().map(|t| t.1), Some(Duration::from_millis(20)));
    assert_eq!(ctl.status().message, "Graham Scan is running...");
}

#[test]
fn uninterrupted_run_reaches_finished() {
    for algo in [Algorithm::JarvisMarch, Algorithm::GrahamScan] {
        let mut ctl = controller(algo, &SQUARE_PLUS_CENTER);
        ctl.start().unwrap();
        let mut waited = Duration::ZERO;
        ctl.drive(|d| waited += d).unwrap();
        assert_eq!(ctl.state(), PlaybackState::Finished);
        assert_eq!(ctl.scheduler().pending(), 0);
        let total = standalone_len(algo, &SQUARE_PLUS_CENTER);
        assert_eq!(ctl.steps_pulled(), total);
        // Finished goes to on_finished, not on_step.
        assert_eq!(ctl.sink().steps.len(), total - 1);
        assert_eq!(ctl.sink().finished.len(), 1);
        let fin = ctl.last_finished().unwrap();
        assert_eq!(fin.hull.ids(), vec![0, 1, 2, 3]);
        // One delay per scheduled pull after the first.
        assert_eq!(waited, PlaybackCfg::default().delay * (total as u32 - 1));
        assert_eq!(ctl.status().message, "Convex hull complete!");
    }
}

#[test]
fn pause_revokes_pending_pull() {
    let mut ctl = controller(Algorithm::JarvisMarch, &SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    let stale = ctl.pending_timer().unwrap();
    ctl.pause().unwrap();
    assert_eq!(ctl.state(), PlaybackState::Paused);
    assert_eq!(ctl.scheduler().pending(), 0);
    assert_eq!(ctl.pending_timer(), None);
    // A late delivery of the revoked timer has no effect.
    ctl.on_timer(stale).unwrap();
    assert_eq!(ctl.sink().steps.len(), 1);
    assert_eq!(ctl.status().message, "Animation paused.");
}

#[test]
fn single_step_pulls_exactly_one_and_stays_paused() {
    let mut ctl = controller(Algorithm::JarvisMarch, &SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    assert!(matches!(
        ctl.single_step(),
        Err(PlaybackError::InvalidTransition { op: "single-step", from: PlaybackState::Running })
    ));
    ctl.pause().unwrap();
    ctl.single_step().unwrap();
    ctl.single_step().unwrap();
    assert_eq!(ctl.sink().steps.len(), 3);
    assert_eq!(ctl.state(), PlaybackState::Paused);
    assert_eq!(ctl.scheduler().pending(), 0);
}

#[test]
fn single_stepping_to_the_end_finishes() {
    let mut ctl = controller(Algorithm::GrahamScan, &SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    ctl.pause().unwrap();
    while ctl.state() == PlaybackState::Paused {
        ctl.single_step().unwrap();
    }
    assert_eq!(ctl.state(), PlaybackState::Finished);
    assert_eq!(ctl.steps_pulled(), standalone_len(Algorithm::GrahamScan, &SQUARE_PLUS_CENTER));
}

#[test]
fn pause_resume_at_any_step_matches_uninterrupted_run() {
    for algo in [Algorithm::JarvisMarch, Algorithm::GrahamScan] {
        let total = standalone_len(algo, &SQUARE_PLUS_CENTER);
        let mut reference = controller(algo, &SQUARE_PLUS_CENTER);
        reference.start().unwrap();
        reference.drive(|_| {}).unwrap();
        let expected = reference.last_finished().unwrap().hull.clone();
        let expected_steps = reference.sink().steps.clone();

        for k in 0..total - 1 {
            let mut ctl = controller(algo, &SQUARE_PLUS_CENTER);
            ctl.start().unwrap();
            for _ in 0..k {
                fire(&mut ctl);
            }
            ctl.pause().unwrap();
            ctl.single_step().unwrap();
            if ctl.state() == PlaybackState::Paused {
                ctl.resume().unwrap();
            }
            ctl.drive(|_| {}).unwrap();
            assert_eq!(ctl.state(), PlaybackState::Finished, "{algo} paused at {k}");
            assert_eq!(ctl.last_finished().unwrap().hull, expected);
            assert_eq!(ctl.sink().steps, expected_steps);
        }
    }
}

#[test]
fn reset_then_start_builds_a_fresh_trace() {
    let mut ctl = controller(Algorithm::JarvisMarch, &SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    fire(&mut ctl);
    fire(&mut ctl);
    let first = ctl.sink().steps[0].clone();
    ctl.reset();
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.scheduler().pending(), 0);
    assert_eq!(ctl.steps_pulled(), 0);
    assert_eq!(ctl.point_count(), 5);

    ctl.sink_mut().steps.clear();
    ctl.start().unwrap();
    assert_eq!(ctl.steps_pulled(), 1);
    assert_eq!(ctl.sink().steps[0], first);
}

#[test]
fn restart_from_finished_is_allowed() {
    let mut ctl = controller(Algorithm::GrahamScan, &SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    ctl.drive(|_| {}).unwrap();
    ctl.set_algorithm(Algorithm::JarvisMarch).unwrap();
    ctl.start().unwrap();
    assert_eq!(ctl.state(), PlaybackState::Running);
    assert!(ctl.last_finished().is_none());
    assert!(matches!(ctl.sink().steps.last(), Some(Step::JarvisProbe(_))));
}

#[test]
fn algorithm_cannot_change_mid_run() {
    let mut ctl = controller(Algorithm::GrahamScan, &SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    assert!(ctl.set_algorithm(Algorithm::JarvisMarch).is_err());
    assert!(ctl.start().is_err());
    assert_eq!(ctl.algorithm(), Algorithm::GrahamScan);
}

#[test]
fn points_added_mid_run_do_not_reach_the_trace() {
    let mut ctl = controller(Algorithm::JarvisMarch, &SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    assert!(ctl.add_point(100.0, 100.0));
    ctl.drive(|_| {}).unwrap();
    let fin = ctl.last_finished().unwrap();
    assert_eq!(fin.hull.len(), 4);
    assert!(!fin.hull.ids().contains(&5));
    assert_eq!(ctl.point_count(), 6);
}

#[test]
fn clear_forgets_points() {
    let mut ctl = controller(Algorithm::JarvisMarch, &SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    ctl.clear();
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.point_count(), 0);
    assert!(ctl.add_point(0.0, 0.0));
    assert_eq!(ctl.points().points()[0].id, 0);
}

/// Real Jarvis trace that fails after a fixed number of pulls.
struct FailAfter {
    inner: JarvisTrace,
    left: usize,
}

impl Trace for FailAfter {
    fn algorithm(&self) -> Algorithm {
        Algorithm::JarvisMarch
    }
    fn pull(&mut self) -> Result<Option<Step>, TraceError> {
        if self.left == 0 {
            return Err(TraceError::Aborted {
                algorithm: Algorithm::JarvisMarch,
                reason: "injected".into(),
            });
        }
        self.left -= 1;
        self.inner.pull()
    }
    fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }
}

/// Trace that runs dry without a terminal step.
struct Dry;

impl Trace for Dry {
    fn algorithm(&self) -> Algorithm {
        Algorithm::GrahamScan
    }
    fn pull(&mut self) -> Result<Option<Step>, TraceError> {
        Ok(None)
    }
    fn is_exhausted(&self) -> bool {
        true
    }
}

#[test]
fn failing_pull_aborts_the_run_and_resets() {
    let mut ctl = controller(Algorithm::JarvisMarch, &SQUARE_PLUS_CENTER);
    let inner = JarvisTrace::new(ctl.points().snapshot(), GeomCfg::default());
    ctl.start_with(Box::new(FailAfter { inner, left: 3 })).unwrap();
    let err = ctl.drive(|_| {}).unwrap_err();
    assert!(matches!(err, PlaybackError::Trace(TraceError::Aborted { .. })));
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.scheduler().pending(), 0);
    assert_eq!(ctl.sink().steps.len(), 3);
    assert_eq!(ctl.sink().aborts.len(), 1);
    assert!(ctl.last_finished().is_none());
}

#[test]
fn trace_without_result_is_an_error() {
    let mut ctl = controller(Algorithm::GrahamScan, &SQUARE_PLUS_CENTER);
    let err = ctl.start_with(Box::new(Dry)).unwrap_err();
    assert!(err.to_string().contains("without a result"));
    assert_eq!(ctl.state(), PlaybackState::Idle);
}

#[test]
fn dual_runs_until_both_lanes_finish() {
    let mut ctl = dual(&SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    ctl.drive(|_| {}).unwrap();
    assert_eq!(ctl.state(), PlaybackState::Finished);
    assert_eq!(ctl.scheduler().pending(), 0);

    let cmp = ctl.comparison().unwrap().clone();
    assert!(cmp.same_vertex_set());
    let j_len = standalone_len(Algorithm::JarvisMarch, &SQUARE_PLUS_CENTER);
    let g_len = standalone_len(Algorithm::GrahamScan, &SQUARE_PLUS_CENTER);
    assert_eq!((cmp.jarvis_steps, cmp.graham_steps), (j_len, g_len));
    assert!(g_len < j_len);

    let sink = ctl.sink();
    // The shorter lane is skipped (and redrawn) on every later tick.
    assert_eq!(sink.retained, j_len - g_len);
    assert_eq!(
        sink.lane_finished,
        vec![Algorithm::GrahamScan, Algorithm::JarvisMarch]
    );
    assert_eq!(sink.comparisons.len(), 1);
    assert_eq!(sink.steps.len(), j_len + g_len - 2);

    let summary = cmp.summary();
    assert!(summary.contains("O(n·h)") && summary.contains("O(n log n)"));
    assert_eq!(summary.matches("ms wall").count(), 2);
    assert!(cmp.jarvis.elapsed <= cmp.jarvis.wall_clock);
}

#[test]
fn dual_lane_failure_aborts_both_lanes() {
    let mut ctl = dual(&SQUARE_PLUS_CENTER);
    let snap = ctl.points().snapshot();
    let jarvis = FailAfter {
        inner: JarvisTrace::new(snap.clone(), GeomCfg::default()),
        left: 2,
    };
    let graham = GrahamTrace::new(snap, GeomCfg::default());
    ctl.start_with(Box::new(jarvis), Box::new(graham)).unwrap();
    assert_eq!(ctl.steps_pulled(), (1, 1));
    assert!(ctl.pending_timer().is_some());

    let err = ctl.drive(|_| {}).unwrap_err();
    assert!(matches!(err, PlaybackError::Trace(TraceError::Aborted { .. })));
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.steps_pulled(), (0, 0));
    assert!(ctl.lane_result(Algorithm::GrahamScan).is_none());
    assert!(ctl.pending_timer().is_none());
    assert_eq!(ctl.scheduler().pending(), 0);
    assert!(ctl.comparison().is_none());
    // Two full ticks, then the Jarvis lane fails before Graham is pulled.
    assert_eq!(ctl.sink().steps.len(), 4);
    assert_eq!(ctl.sink().aborts.len(), 1);
    assert!(ctl.sink().comparisons.is_empty());
}

#[test]
fn dual_start_with_is_rejected_mid_run() {
    let mut ctl = dual(&SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    let snap = ctl.points().snapshot();
    let err = ctl
        .start_with(
            Box::new(JarvisTrace::new(snap.clone(), GeomCfg::default())),
            Box::new(GrahamTrace::new(snap, GeomCfg::default())),
        )
        .unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidTransition { op: "start", .. }));
    assert_eq!(ctl.steps_pulled(), (1, 1));
}

#[test]
fn dual_lanes_see_identical_input() {
    let mut ctl = dual(&SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    ctl.add_point(-5.0, -5.0);
    ctl.drive(|_| {}).unwrap();
    let j = ctl.lane_result(Algorithm::JarvisMarch).unwrap();
    let g = ctl.lane_result(Algorithm::GrahamScan).unwrap();
    assert_eq!(j.complexity.big_o(), "O(n·h)");
    assert!(matches!(j.complexity, crate::trace::Complexity::JarvisMarch { n: 5, h: 4 }));
    assert!(matches!(g.complexity, crate::trace::Complexity::GrahamScan { n: 5, h: 4 }));
}

#[test]
fn dual_controls_apply_to_both_lanes() {
    let mut ctl = dual(&SQUARE_PLUS_CENTER);
    ctl.start().unwrap();
    assert_eq!(ctl.steps_pulled(), (1, 1));
    ctl.pause().unwrap();
    assert_eq!(ctl.scheduler().pending(), 0);
    ctl.single_step().unwrap();
    assert_eq!(ctl.steps_pulled(), (2, 2));
    assert_eq!(ctl.state(), PlaybackState::Paused);
    ctl.resume().unwrap();
    assert_eq!(ctl.steps_pulled(), (3, 3));
    assert_eq!(ctl.scheduler().pending(), 1);

    ctl.reset();
    assert_eq!(ctl.state(), PlaybackState::Idle);
    assert_eq!(ctl.steps_pulled(), (0, 0));
    assert_eq!(ctl.scheduler().pending(), 0);
    assert!(ctl.comparison().is_none());
}

#[test]
fn dual_rejects_small_inputs() {
    let mut ctl = dual(&[(0.0, 0.0), (1.0, 1.0)]);
    assert!(matches!(ctl.start(), Err(PlaybackError::NotEnoughPoints { have: 2, .. })));
    assert_eq!(ctl.state(), PlaybackState::Idle);
}

#[test]
fn dual_collinear_input_yields_matching_segments() {
    let mut ctl = dual(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
    ctl.start().unwrap();
    ctl.drive(|_| {}).unwrap();
    let cmp = ctl.comparison().unwrap();
    assert!(cmp.same_vertex_set());
    assert_eq!(cmp.jarvis.hull.ids(), vec![0, 2]);
}
