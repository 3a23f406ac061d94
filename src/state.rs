use std::path::{Path, PathBuf};

use rusty_pareto::color::ColorMap;
use rusty_pareto::config::ExperimentConfig;
use rusty_pareto::data::filter::{
    at_generation, for_seed, select_all_policies, selected, with_rank, FrontMode, PolicySelection,
};
use rusty_pareto::data::loader::load_fronts;
use rusty_pareto::data::model::{FrontRecord, FrontTable, Policy};
use rusty_pareto::hypervolume::hypervolume;
use rusty_pareto::pareto::{CostPoint, Costed};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Hypervolume of one policy's visible points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyVolume {
    pub policy: Policy,
    pub points: usize,
    pub hypervolume: f64,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Rank and reference point come from here.
    pub config: ExperimentConfig,

    /// Loaded checkpoint table (None until the user opens a file).
    pub table: Option<FrontTable>,

    /// File the table was read from.
    pub source: Option<PathBuf>,

    pub seed: Option<u64>,
    pub generation: Option<u32>,
    pub mode: FrontMode,

    /// Enabled policies.
    pub policies: PolicySelection,

    pub color_map: ColorMap<Policy>,

    /// Rows of the current slice after selection and mode (cached).
    pub visible: Vec<FrontRecord>,

    /// Per-policy hypervolume of `visible`, in policy order.
    pub volumes: Vec<PolicyVolume>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ExperimentConfig::default())
    }
}

impl AppState {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            table: None,
            source: None,
            seed: None,
            generation: None,
            mode: FrontMode::default(),
            policies: select_all_policies(),
            color_map: ColorMap::new(Policy::ALL),
            visible: Vec::new(),
            volumes: Vec::new(),
            status_message: None,
        }
    }

    /// Load a checkpoint CSV; failures end up in `status_message`.
    pub fn open(&mut self, path: &Path) {
        match load_fronts(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows ({} seeds, {} generations) from {}",
                    table.len(),
                    table.seeds.len(),
                    table.generations.len(),
                    path.display()
                );
                self.set_table(table);
                self.source = Some(path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded table and pick the initial slice.
    ///
    /// The configured generation is preferred when present, otherwise the
    /// latest one. The first seed is selected.
    pub fn set_table(&mut self, table: FrontTable) {
        self.seed = table.seeds.first().copied();
        self.generation = if table.generations.contains(&self.config.generation) {
            Some(self.config.generation)
        } else {
            table.generations.last().copied()
        };
        self.policies = select_all_policies();

        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible` and `volumes` after any selection change.
    pub fn refilter(&mut self) {
        self.visible.clear();
        self.volumes.clear();

        let (Some(table), Some(seed), Some(generation)) = (&self.table, self.seed, self.generation)
        else {
            return;
        };

        let ranked = with_rank(&table.records, self.config.rank);
        let slice = for_seed(&at_generation(&ranked, generation), seed);
        let enabled = selected(&slice, &self.policies);
        self.visible = self.mode.apply(&enabled).into_iter().cloned().collect();

        let reference = self.config.reference();
        self.volumes = self
            .policies
            .iter()
            .filter_map(|&policy| {
                let points: Vec<CostPoint> = self
                    .visible
                    .iter()
                    .filter(|r| r.policy == policy)
                    .map(|r| r.cost())
                    .collect();
                (!points.is_empty()).then(|| PolicyVolume {
                    policy,
                    points: points.len(),
                    hypervolume: hypervolume(&points, reference),
                })
            })
            .collect();
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
        self.refilter();
    }

    pub fn set_generation(&mut self, generation: u32) {
        self.generation = Some(generation);
        self.refilter();
    }

    pub fn set_mode(&mut self, mode: FrontMode) {
        self.mode = mode;
        self.refilter();
    }

    pub fn toggle_policy(&mut self, policy: Policy) {
        if !self.policies.remove(&policy) {
            self.policies.insert(policy);
        }
        self.refilter();
    }

    pub fn select_all(&mut self) {
        self.policies = select_all_policies();
        self.refilter();
    }

    pub fn select_none(&mut self) {
        self.policies.clear();
        self.refilter();
    }

    /// Visible rows of one policy.
    pub fn visible_for(&self, policy: Policy) -> impl Iterator<Item = &FrontRecord> + '_ {
        self.visible.iter().filter(move |r| r.policy == policy)
    }
}
