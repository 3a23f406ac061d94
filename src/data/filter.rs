use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{FrontRecord, Policy};
use crate::pareto::{self, CostPoint, Costed};

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// Rows carrying the solver-assigned `rank`. Ranks are taken as reported, never recomputed.
pub fn with_rank(records: &[FrontRecord], rank: u32) -> Vec<&FrontRecord> {
    records.iter().filter(|r| r.rank == rank).collect()
}

/// Rows logged at `generation`.
pub fn at_generation<'a>(records: &[&'a FrontRecord], generation: u32) -> Vec<&'a FrontRecord> {
    records
        .iter()
        .copied()
        .filter(|r| r.generation == generation)
        .collect()
}

/// Rows belonging to `seed`.
pub fn for_seed<'a>(records: &[&'a FrontRecord], seed: u64) -> Vec<&'a FrontRecord> {
    records.iter().copied().filter(|r| r.seed == seed).collect()
}

/// Key identifying one solver run at one checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunKey {
    pub seed: u64,
    pub generation: u32,
    pub policy: Policy,
}

/// Cost points grouped by (seed, generation, policy). Groups with no rows do not appear.
pub fn group_by_run(records: &[&FrontRecord]) -> BTreeMap<RunKey, Vec<CostPoint>> {
    let mut groups: BTreeMap<RunKey, Vec<CostPoint>> = BTreeMap::new();
    for r in records {
        let key = RunKey {
            seed: r.seed,
            generation: r.generation,
            policy: r.policy,
        };
        groups.entry(key).or_default().push(r.cost());
    }
    groups
}

// ---------------------------------------------------------------------------
// Front view mode
// ---------------------------------------------------------------------------

/// How a (seed, generation) slice is turned into plotted points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontMode {
    /// Every policy's first-rank points, as the solver reported them.
    #[default]
    Individual,
    /// Dominance recomputed over the union of all policies.
    Global,
}

impl FrontMode {
    pub const ALL: [FrontMode; 2] = [FrontMode::Individual, FrontMode::Global];

    /// Suffix used in output file names.
    pub const fn file_suffix(self) -> &'static str {
        match self {
            FrontMode::Individual => "INDIVIDUAL",
            FrontMode::Global => "GLOBAL",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            FrontMode::Individual => "Per-policy comparison",
            FrontMode::Global => "Global front (best overall)",
        }
    }

    /// Apply the mode to an already rank-filtered slice.
    pub fn apply<'a>(self, slice: &[&'a FrontRecord]) -> Vec<&'a FrontRecord> {
        match self {
            FrontMode::Individual => slice.to_vec(),
            FrontMode::Global => pareto::filter(slice),
        }
    }
}

impl fmt::Display for FrontMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontMode::Individual => f.write_str("Individual"),
            FrontMode::Global => f.write_str("Global"),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy selection
// ---------------------------------------------------------------------------

/// Enabled policies. Rows of a disabled policy are hidden.
pub type PolicySelection = BTreeSet<Policy>;

/// Initialise a [`PolicySelection`] with every policy enabled.
pub fn select_all_policies() -> PolicySelection {
    Policy::ALL.into_iter().collect()
}

/// Rows of the enabled policies only.
pub fn selected<'a>(records: &[&'a FrontRecord], selection: &PolicySelection) -> Vec<&'a FrontRecord> {
    records
        .iter()
        .copied()
        .filter(|r| selection.contains(&r.policy))
        .collect()
}
