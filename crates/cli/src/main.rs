mod input;
mod provenance;
mod sink;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hulltrace::api::{
    Algorithm, DualPlaybackController, GeomCfg, ManualScheduler, PlaybackCfg, PlaybackController,
    PointSet,
};
use input::Source;
use provenance::Provenance;
use sink::JsonLines;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "hulltrace")]
#[command(about = "Step through Jarvis March and Graham Scan from the terminal")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Play one algorithm and write every step as a JSON line
    Run {
        #[arg(long, value_enum)]
        algo: AlgoArg,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Play both algorithms in lockstep and write the comparison
    Compare {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgoArg {
    Jarvis,
    Graham,
}

impl From<AlgoArg> for Algorithm {
    fn from(a: AlgoArg) -> Self {
        match a {
            AlgoArg::Jarvis => Algorithm::JarvisMarch,
            AlgoArg::Graham => Algorithm::GrahamScan,
        }
    }
}

#[derive(Args)]
struct InputArgs {
    /// JSON file of `[x, y]` pairs or `{"x", "y"}` objects
    #[arg(long, conflicts_with = "random")]
    points: Option<PathBuf>,
    /// Draw this many random grid points instead of reading a file
    #[arg(long)]
    random: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Delay between steps; 0 runs as fast as possible
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Collinearity tolerance (relative)
    #[arg(long)]
    eps: Option<f64>,
    /// Output file; stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

impl InputArgs {
    fn source(&self) -> Result<Source> {
        match (&self.points, self.random) {
            (Some(path), _) => Ok(Source::File(path.clone())),
            (None, Some(count)) => Ok(Source::Random {
                count,
                seed: self.seed,
            }),
            (None, None) => anyhow::bail!("pass --points FILE or --random N"),
        }
    }

    fn playback_cfg(&self) -> PlaybackCfg {
        let mut geom = GeomCfg::default();
        if let Some(eps) = self.eps {
            geom.eps_collinear = eps;
        }
        PlaybackCfg {
            delay: Duration::from_millis(self.delay_ms),
            geom,
        }
    }

    fn params(&self) -> serde_json::Value {
        serde_json::json!({
            "points": self.points,
            "random": self.random,
            "seed": self.seed,
            "delay_ms": self.delay_ms,
            "eps": self.playback_cfg().geom.eps_collinear,
        })
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run { algo, input } => run(algo.into(), input),
        Action::Compare { input } => compare(input),
        Action::Report => report(),
    }
}

fn load(args: &InputArgs) -> Result<PointSet> {
    let points = input::load(&args.source()?)?;
    tracing::info!(points = points.point_count(), "input loaded");
    Ok(points)
}

fn open_output(out: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(path) = out else {
        return Ok(Box::new(io::stdout().lock()));
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run(algo: Algorithm, args: InputArgs) -> Result<()> {
    let points = load(&args)?;
    let n = points.point_count();
    let sink = JsonLines::new(open_output(args.out.as_deref())?);
    let mut ctl = PlaybackController::new(algo, args.playback_cfg(), ManualScheduler::new(), sink)
        .with_points(points);
    ctl.start()?;
    ctl.drive(thread::sleep)?;
    let lines = ctl.sink_mut().finish()?;

    let finished = ctl
        .last_finished()
        .context("trace stopped without a hull")?;
    tracing::info!(
        lines,
        hull = finished.hull.len(),
        elapsed = ?finished.elapsed,
        wall_clock = ?finished.wall_clock,
        "{}",
        finished.complexity
    );
    if let Some(out) = &args.out {
        let mut params = args.params();
        params["algo"] = serde_json::json!(algo);
        provenance::write_sidecar(out, Provenance::new("run", params, n))?;
    }
    Ok(())
}

fn compare(args: InputArgs) -> Result<()> {
    let points = load(&args)?;
    let n = points.point_count();
    let sink = JsonLines::new(open_output(args.out.as_deref())?);
    let mut ctl = DualPlaybackController::new(args.playback_cfg(), ManualScheduler::new(), sink)
        .with_points(points);
    ctl.start()?;
    ctl.drive(thread::sleep)?;
    ctl.sink_mut().finish()?;

    let cmp = ctl
        .comparison()
        .context("comparison stopped before both hulls closed")?;
    for line in cmp.summary().lines() {
        tracing::info!("{line}");
    }
    if !cmp.same_vertex_set() {
        tracing::warn!(
            jarvis = ?cmp.jarvis.hull.ids(),
            graham = ?cmp.graham.hull.ids(),
            "hull vertex sets differ"
        );
    }
    if let Some(out) = &args.out {
        provenance::write_sidecar(out, Provenance::new("compare", args.params(), n))?;
    }
    Ok(())
}

fn report() -> Result<()> {
    let doc = Provenance::new("report", serde_json::json!({}), 0);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
