//! fast-track — one broker spreading bursty waves over a mixed VM pool.
//!
//! A single producer replays the wave schedule below into a broker running
//! the Min-Min / Max-Min fast-track policy.  The broker feeds five VMs of
//! different speeds.  Output lands in `output/fast-track/`.
//!
//! Set `RUST_LOG=ss_policy=debug` to see every track partition.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ss_core::{EntityId, SimConfig, Step, Task, TaskId};
use ss_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ss_policy::FastTrackConfig;
use ss_sim::{EntityTree, SimBuilder, SimObserver, StepSummary};
use ss_workload::load_waves_reader;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64   = 42;
const TOTAL_STEPS:           u64   = 2_000;
const OUTPUT_INTERVAL_STEPS: u64   = 10;
const MARGIN:                f64   = 0.4;
const VM_RATES:              [u64; 5] = [1, 2, 2, 4, 8];
const OUTPUT_DIR:            &str  = "output/fast-track";

// ── Wave CSV ──────────────────────────────────────────────────────────────────

// Morning trickle, a lunchtime burst of mixed sizes, then an evening batch of
// large jobs.  Rows with min == max are fixed-size waves.
const WAVES_CSV: &str = "\
step,count,min_units,max_units\n\
0,10,1,10\n\
20,5,3,3\n\
40,40,1,30\n\
45,20,1,5\n\
80,8,40,60\n\
";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:       SimOutputObserver<W>,
    commits:     usize,
    completions: usize,
    busiest:     StepSummary,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, commits: 0, completions: 0, busiest: StepSummary::default() }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_task_committed(&mut self, step: Step, scheduler: EntityId, consumer: EntityId, task: &Task) {
        self.commits += 1;
        self.inner.on_task_committed(step, scheduler, consumer, task);
    }

    fn on_task_completed(&mut self, _step: Step, _consumer: EntityId, _task: TaskId) {
        self.completions += 1;
    }

    fn on_step_end(&mut self, summary: &StepSummary) {
        if summary.outstanding_units > self.busiest.outstanding_units {
            self.busiest = *summary;
        }
        self.inner.on_step_end(summary);
    }

    fn on_snapshot(&mut self, step: Step, tree: &EntityTree) {
        self.inner.on_snapshot(step, tree);
    }

    fn on_sim_end(&mut self, final_step: Step) {
        self.inner.on_sim_end(final_step);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== fast-track — schedule_sim ===");
    println!("VMs: {VM_RATES:?}  |  margin: {MARGIN}  |  seed: {SEED}");
    println!();

    // 1. Load the wave schedule.
    let waves = load_waves_reader(Cursor::new(WAVES_CSV))?;
    println!(
        "Loaded {} waves, last at {}",
        waves.len(),
        waves.last_step().unwrap_or(Step::ZERO)
    );

    // 2. Build the tree: producer → broker → VMs.
    let mut tree = EntityTree::new();
    let producer = tree.add_producer("users");
    let broker = tree.add_fast_track_scheduler("broker", FastTrackConfig { margin: MARGIN })?;
    tree.add_child(producer, broker)?;
    let mut vms = Vec::with_capacity(VM_RATES.len());
    for (i, rate) in VM_RATES.into_iter().enumerate() {
        let vm = tree.add_consumer(format!("vm-{i}"), rate)?;
        tree.add_child(broker, vm)?;
        vms.push(vm);
    }
    tree.set_wave_schedule(producer, waves)?;

    // 3. Sim config.
    let config = SimConfig {
        total_steps:           TOTAL_STEPS,
        seed:                  SEED,
        output_interval_steps: OUTPUT_INTERVAL_STEPS,
    };
    let mut sim = SimBuilder::new(config, tree).build()?;

    // 4. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer));

    // 5. Run.
    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  steps run        : {}", summary.steps);
    println!("  tasks submitted  : {}", summary.tasks_submitted);
    println!("  tasks completed  : {}", summary.tasks_completed);
    println!("  commits observed : {}", obs.commits);
    println!("  completions      : {}", obs.completions);
    println!("  warnings         : {}", summary.warnings);
    println!(
        "  peak backlog     : {} units at {}",
        obs.busiest.outstanding_units, obs.busiest.step
    );
    println!();

    // 7. Per-VM table.
    println!("{:<8} {:>6} {:>8} {:>8}", "VM", "rate", "tasks", "units");
    println!("{}", "-".repeat(33));
    for vm in vms {
        let Some(entity) = sim.tree.get(vm) else { continue };
        let Some(consumer) = entity.as_consumer() else { continue };
        println!(
            "{:<8} {:>6} {:>8} {:>8}",
            entity.name(),
            consumer.units_per_step(),
            consumer.tasks_completed(),
            consumer.units_completed(),
        );
    }

    Ok(())
}
