//! corridor — smallest end-to-end run of the gridnav engine.
//!
//! A 40 × 20 map is split by a wall with a four-cell gap.  Agents spawn at
//! random cells on the left and head for the mirrored cell on the right, so
//! every one of them has to squeeze through the gap.  One agent is three
//! cells wide and one is a ghost that ignores (and is ignored by) the rest.
//!
//! Usage: `corridor [config.json]`.  The optional file is a `SimConfig` in
//! JSON; missing fields take their defaults.  Set `RUST_LOG=debug` for the
//! engine's own logging.

use std::cell::Cell;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use gn_agent::{AgentEvent, NavigationAgent};
use gn_core::{GridPoint, Point, SimConfig, Size, Tick};
use gn_output::{CsvWriter, NavOutputObserver, OutputWriter};
use gn_world::{AgentBuilder, MapBuilder, TickSummary, World, WorldObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize     = 12;
const SEED:        u64       = 42;
const GRID:        Size<i32> = Size::new(40, 20);
const WALL_X:      i32       = 20;
const GAP:         (i32, i32) = (8, 12); // rows [8, 12) stay open
const OUTPUT_DIR:  &str      = "output/corridor";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:        NavOutputObserver<W>,
    event_rows:   usize,
    summary_rows: usize,
    peak_blocked: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: NavOutputObserver<W>) -> Self {
        Self { inner, event_rows: 0, summary_rows: 0, peak_blocked: 0 }
    }
}

impl<W: OutputWriter> WorldObserver for CountingObserver<W> {
    fn on_agent_event(&mut self, tick: Tick, agent: &NavigationAgent, event: AgentEvent) {
        self.event_rows += 1;
        self.inner.on_agent_event(tick, agent, event);
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.summary_rows += 1;
        self.peak_blocked = self.peak_blocked.max(summary.blocked);
        self.inner.on_tick_end(tick, summary);
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        self.inner.on_run_end(final_tick);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<SimConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(SimConfig { dt_secs: 0.25, total_ticks: 400, ..SimConfig::default() }),
    }
}

/// Distinct random spawn cells in the left half, clear of the border.
fn spawn_cells(rng: &mut SmallRng, n: usize) -> Vec<GridPoint> {
    let mut seen = HashSet::new();
    let mut cells = Vec::with_capacity(n);
    while cells.len() < n {
        let cell = GridPoint::new(rng.gen_range(2..WALL_X - 4), rng.gen_range(2..GRID.height - 2));
        // Leave room around the wide agent's spawn.
        if cell.x <= 4 && (8..12).contains(&cell.y) {
            continue;
        }
        if seen.insert(cell) {
            cells.push(cell);
        }
    }
    cells
}

fn mirror(cell: GridPoint) -> GridPoint {
    GridPoint::new(GRID.width - 1 - cell.x, cell.y)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    println!("=== corridor — gridnav ===");

    let config = load_config()?;
    println!(
        "Grid: {GRID}  |  Agents: {}  |  Ticks: {} × {:.2} s  |  Seed: {SEED}",
        AGENT_COUNT + 1,
        config.total_ticks,
        config.dt_secs
    );

    // 1. Map: a wall at WALL_X with a gap.
    let mut world = World::new(config.clone())?;
    let map = MapBuilder::new(GRID)
        .cell_size(Size::new(32.0, 32.0))
        .block_region(GridPoint::new(WALL_X, 0), Size::new(1, GAP.0))
        .block_region(GridPoint::new(WALL_X, GAP.1), Size::new(1, GRID.height - GAP.1))
        .build(&mut world)?;

    // 2. Agents.
    let mut rng = SmallRng::seed_from_u64(SEED);
    for cell in spawn_cells(&mut rng, AGENT_COUNT - 1) {
        let speed = rng.gen_range(1.5..4.0);
        AgentBuilder::at_cell(map, cell)
            .speed(speed)
            .goal(mirror(cell).center(), 0.0)
            .spawn(&mut world)?;
    }
    AgentBuilder::new(map, Point::new(2.5, 10.5))
        .footprint(3)
        .speed(2.0)
        .goal(Point::new(37.5, 10.5), 0.5)
        .spawn(&mut world)?;
    AgentBuilder::new(map, Point::new(1.5, 1.5))
        .ghost()
        .speed(3.0)
        .goal(Point::new(38.5, 18.5), 0.0)
        .spawn(&mut world)?;
    info!("spawned {} agents", world.agent_count());

    // 3. Signal subscriptions: count arrivals per agent.
    let arrivals = Rc::new(Cell::new(0usize));
    let mut receivers = Vec::new();
    for id in world.agents().map(NavigationAgent::id).collect::<Vec<_>>() {
        let arrivals = Rc::clone(&arrivals);
        receivers.push(world.signals(id)?.on_arrive.connect(move |_| arrivals.set(arrivals.get() + 1)));
    }

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(NavOutputObserver::new(writer, &config));

    // 5. Run.
    let t0 = Instant::now();
    world.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Snapshot.
    let snapshot_path = Path::new(OUTPUT_DIR).join("world.json");
    world.snapshot().save(&snapshot_path)?;

    // 7. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  agent_events.csv   : {} rows", obs.event_rows);
    println!("  tick_summaries.csv : {} rows", obs.summary_rows);
    println!("  world.json         : {}", snapshot_path.display());
    println!("  arrivals           : {}", arrivals.get());
    println!("  peak blocked       : {}", obs.peak_blocked);
    println!();

    // 8. Final agent table.
    let layout = *world.layout(map)?;
    println!("{:<10} {:<9} {:<16} {:<18} {:<5}", "Agent", "State", "Grid", "Local", "Size");
    println!("{}", "-".repeat(62));
    for agent in world.agents() {
        let local = layout.local_from_grid(agent.position());
        println!(
            "{:<10} {:<9} {:<16} {:<18} {:<5}",
            agent.id().0,
            agent.state().as_str(),
            format!("({:.1}, {:.1})", agent.position().x, agent.position().y),
            format!("({:.0}, {:.0})", local.x, local.y),
            if agent.footprint_enabled() { agent.footprint_size().to_string() } else { "ghost".into() },
        );
    }

    drop(receivers);
    Ok(())
}
