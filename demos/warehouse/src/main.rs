//! warehouse: streams synthetic telemetry from a small warehouse floor.
//!
//! Builds the embedded lane layout (or loads one with `--lanes`), spawns the
//! configured population, runs the tick scheduler for a wall-clock duration
//! and writes `position_ticks.csv` / `events.csv` when `--out` is given.
//!
//! ```text
//! RUST_LOG=debug cargo run -p warehouse -- --seconds 30 --out output/warehouse
//! ```

mod layout;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use dt_core::SimConfig;
use dt_events::{Event, Severity};
use dt_output::{CsvWriter, OutputSink};
use dt_sim::{NoopSink, PositionTick, Scheduler, Sim, SimBuilder, TelemetrySink};
use dt_spatial::{ZoneClassifier, load_lane_graph_csv};

use layout::warehouse_graph;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(version, about = "Facility movement twin: warehouse telemetry demo")]
struct Cli {
    /// JSON file with `SimConfig` fields; missing fields keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Lane CSV (`lane,seq,x,y,width`) replacing the embedded layout.
    #[arg(long, value_name = "PATH")]
    lanes: Option<PathBuf>,

    /// Wall-clock run time.
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Directory for CSV output; telemetry is only counted when omitted.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    sim_speed: Option<f64>,
}

impl Cli {
    fn load_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => SimConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(speed) = self.sim_speed {
            config.sim_speed = speed;
        }
        Ok(config)
    }
}

// ── Tally sink ────────────────────────────────────────────────────────────────

/// Counts what passes through on the way to `inner`.
struct Tally<S> {
    inner:     S,
    batches:   u64,
    positions: u64,
    events:    BTreeMap<&'static str, u64>,
}

impl<S> Tally<S> {
    fn new(inner: S) -> Self {
        Self { inner, batches: 0, positions: 0, events: BTreeMap::new() }
    }
}

impl<S: TelemetrySink> TelemetrySink for Tally<S> {
    fn on_position_tick(&mut self, batch: &[PositionTick]) {
        self.batches += 1;
        self.positions += batch.len() as u64;
        self.inner.on_position_tick(batch);
    }

    fn on_event(&mut self, event: &Event) {
        *self.events.entry(event.kind.as_str()).or_default() += 1;
        if event.severity == Severity::High {
            info!("{} {} at {} {:?}", event.id, event.kind, event.location, event.entities);
        }
        self.inner.on_event(event);
    }

    fn on_stop(&mut self) {
        self.inner.on_stop();
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn run<S>(sim: Sim, sink: S, seconds: f64) -> Result<(Sim, Tally<S>)>
where
    S: TelemetrySink + Send + 'static,
{
    let mut scheduler = Scheduler::new(sim, Tally::new(sink));
    scheduler.start()?;
    std::thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));
    Ok(scheduler.into_inner()?)
}

fn report<S>(sim: &Sim, tally: &Tally<S>, elapsed: Duration) {
    info!(
        "ran {} ticks in {:.2} s wall, clock at {}",
        tally.batches,
        elapsed.as_secs_f64(),
        sim.clock
    );
    info!("  position records : {}", tally.positions);
    for (kind, n) in &tally.events {
        info!("  {kind:<15} : {n}");
    }

    for e in sim.entities.iter() {
        info!(
            "  {} {:<7} ({:>6.2}, {:>6.2}) {:>5.2} u/s  {}",
            e.id,
            e.kind.as_str(),
            e.position.x,
            e.position.y,
            e.speed,
            sim.zones.name(e.zone)
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    let graph = match &cli.lanes {
        Some(path) => load_lane_graph_csv(path).with_context(|| format!("loading {}", path.display()))?,
        None => warehouse_graph()?,
    };
    info!("lane graph: {} lanes", graph.lane_count());

    let sim = SimBuilder::new(config, Arc::new(graph))
        .zones(ZoneClassifier::warehouse()?)
        .build()?;

    let t0 = Instant::now();
    match &cli.out {
        Some(dir) => {
            let writer = CsvWriter::new(dir).with_context(|| format!("creating {}", dir.display()))?;
            let (sim, mut tally) = run(sim, OutputSink::new(writer), cli.seconds)?;
            if let Some(e) = tally.inner.take_error() {
                error!("output error: {e}");
            }
            report(&sim, &tally, t0.elapsed());
            info!("wrote {} rows to {}", tally.inner.positions_written(), dir.display());
        }
        None => {
            warn!("no --out directory given; telemetry is counted but not written");
            let (sim, tally) = run(sim, NoopSink, cli.seconds)?;
            report(&sim, &tally, t0.elapsed());
        }
    }

    Ok(())
}
