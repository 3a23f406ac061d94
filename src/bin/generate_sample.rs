//! Writes a synthetic `results/` tree: checkpoint fronts and Gantt files for
//! every instance, seed and policy, shaped like the solver's output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rusty_pareto::config::ExperimentConfig;
use rusty_pareto::data::model::{FrontRecord, GanttRecord, Policy};

#[derive(Parser)]
#[command(about = "Generate a synthetic results directory")]
struct Args {
    /// Output results directory.
    #[arg(long, default_value = "results")]
    out: PathBuf,
    /// Jobs per Gantt schedule.
    #[arg(long, default_value_t = 6)]
    jobs: u32,
    /// Machines per Gantt schedule.
    #[arg(long, default_value_t = 4)]
    machines: u32,
}

const CHECKPOINTS: [u32; 6] = [1, 20, 40, 60, 80, 100];
const OPERATIONS_PER_JOB: u32 = 3;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn below(&mut self, n: u32) -> u32 {
        (self.next_u64() % n.max(1) as u64) as u32
    }
}

/// A trade-off curve that tightens as the run progresses, plus a dominated
/// second rank.
fn front_rows(rng: &mut SimpleRng, seed: u64, generation: u32, policy: Policy) -> Vec<FrontRecord> {
    let progress = generation as f64 / 100.0;
    let base = 420.0 + 25.0 * policy.index() as f64 - 80.0 * progress;
    let n = 4 + rng.below(5);

    let mut rows = Vec::new();
    for rank in [1u32, 2] {
        let offset = if rank == 1 { 0.0 } else { 40.0 };
        for i in 0..n {
            let t = base + offset + 30.0 * i as f64 + rng.range(0.0, 8.0);
            let energy = 160_000.0 / t + offset + rng.range(0.0, 10.0);
            rows.push(FrontRecord {
                seed,
                generation,
                policy,
                rank,
                time_fitness: t.round(),
                energy_fitness: (energy * 10.0).round() / 10.0,
                crossover_p: Some(rng.range(60.0, 95.0).round()),
                mutation_p: Some(rng.range(1.0, 20.0).round()),
            });
        }
    }
    rows
}

/// List schedule: each job's operations run in order on random machines.
fn schedule(rng: &mut SimpleRng, jobs: u32, machines: u32) -> Vec<GanttRecord> {
    let mut machine_free = vec![0.0f64; machines as usize];
    let mut job_free = vec![0.0f64; jobs as usize];
    let mut ops = Vec::new();

    for operation in 1..=OPERATIONS_PER_JOB {
        for job in 1..=jobs {
            let machine = 1 + rng.below(machines);
            let m = (machine - 1) as usize;
            let j = (job - 1) as usize;
            let start = machine_free[m].max(job_free[j]);
            let end = start + rng.range(2.0, 12.0).round();
            machine_free[m] = end;
            job_free[j] = end;
            ops.push(GanttRecord {
                machine,
                job,
                operation,
                start,
                end,
            });
        }
    }
    ops
}

fn write_csv<T: serde::Serialize>(path: &std::path::Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = ExperimentConfig {
        results_dir: args.out,
        ..ExperimentConfig::default()
    };

    let mut rng = SimpleRng::new(42);
    let mut fronts_written = 0;
    let mut gantt_written = 0;

    for instance in &config.instances {
        let mut rows = Vec::new();
        for &seed in &config.seeds {
            for generation in CHECKPOINTS {
                for &policy in &config.policies {
                    rows.extend(front_rows(&mut rng, seed, generation, policy));
                }
            }
        }
        write_csv(&config.fronts_path(instance), &rows)?;
        fronts_written += rows.len();

        for &policy in &config.policies {
            for &seed in &config.seeds {
                let ops = schedule(&mut rng, args.jobs, args.machines);
                write_csv(&config.gantt_path(instance, policy, seed), &ops)?;
                gantt_written += 1;
            }
        }
        log::info!("[{instance}] written");
    }

    println!(
        "Wrote {fronts_written} front rows and {gantt_written} schedules to {}",
        config.results_dir.display()
    );
    Ok(())
}
