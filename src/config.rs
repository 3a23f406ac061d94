use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::Policy;
use crate::pareto::CostPoint;

/// Seeds the solver runs for every instance.
pub const DEFAULT_SEEDS: [u64; 30] = [
    0, 1, 2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79,
    83, 89, 97, 101, 103, 107,
];

/// Where the experiment lives and which slices to post-process.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub instances: Vec<String>,
    pub seeds: Vec<u64>,
    pub policies: Vec<Policy>,
    /// Checkpoint generation shown in the front plots.
    pub generation: u32,
    /// Solver-assigned rank treated as "the front".
    pub rank: u32,
    /// Hypervolume reference point `[time, energy]`.
    pub reference_point: [f64; 2],
    pub results_dir: PathBuf,
    pub plots_dir: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            instances: ["Eg1", "Eg2", "Eg3"].map(String::from).to_vec(),
            seeds: DEFAULT_SEEDS.to_vec(),
            policies: Policy::ALL.to_vec(),
            generation: 100,
            rank: 1,
            reference_point: [1000.0, 1000.0],
            results_dir: PathBuf::from("results"),
            plots_dir: PathBuf::from("plots"),
        }
    }
}

impl ExperimentConfig {
    /// Read a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn reference(&self) -> CostPoint {
        CostPoint::new(self.reference_point[0], self.reference_point[1])
    }

    /// `results/<instance>/all_checkpoint_fronts.csv`
    pub fn fronts_path(&self, instance: &str) -> PathBuf {
        self.results_dir.join(instance).join("all_checkpoint_fronts.csv")
    }

    /// `results/<instance>/<policy>/seed_<seed>_solution_1.txt`
    pub fn gantt_path(&self, instance: &str, policy: Policy, seed: u64) -> PathBuf {
        self.results_dir
            .join(instance)
            .join(policy.as_str())
            .join(format!("seed_{seed}_solution_1.txt"))
    }

    /// `results/<instance>/hypervolume_report.csv`
    pub fn report_path(&self, instance: &str) -> PathBuf {
        self.results_dir.join(instance).join("hypervolume_report.csv")
    }

    /// `plots/<instance>`
    pub fn plot_dir(&self, instance: &str) -> PathBuf {
        self.plots_dir.join(instance)
    }
}
