use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pareto::{CostPoint, Costed};

// ---------------------------------------------------------------------------
// Policy – the dispatch rule a run was evaluated under
// ---------------------------------------------------------------------------

/// Dispatch policies compared by the experiment.
///
/// The derived `Ord` follows declaration order, which is also the order
/// used for plot panels and report columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Policy {
    #[serde(rename = "FIFO")]
    Fifo,
    #[serde(rename = "LTP")]
    Ltp,
    #[serde(rename = "STP")]
    Stp,
    #[serde(rename = "RR_FIFO")]
    RrFifo,
    #[serde(rename = "RR_LTP")]
    RrLtp,
    #[serde(rename = "RR_ECA")]
    RrEca,
}

impl Policy {
    pub const ALL: [Policy; 6] = [
        Policy::Fifo,
        Policy::Ltp,
        Policy::Stp,
        Policy::RrFifo,
        Policy::RrLtp,
        Policy::RrEca,
    ];

    /// Name used in CSV files and directory names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Policy::Fifo => "FIFO",
            Policy::Ltp => "LTP",
            Policy::Stp => "STP",
            Policy::RrFifo => "RR_FIFO",
            Policy::RrLtp => "RR_LTP",
            Policy::RrEca => "RR_ECA",
        }
    }

    /// Position in [`Policy::ALL`].
    pub fn index(self) -> usize {
        Policy::ALL.iter().position(|&p| p == self).unwrap_or_default()
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy '{0}'")]
pub struct UnknownPolicy(pub String);

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FrontRecord – one row of the checkpoint fronts file
// ---------------------------------------------------------------------------

/// One solution logged at a checkpoint generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontRecord {
    #[serde(rename = "Seed")]
    pub seed: u64,
    #[serde(rename = "Generation")]
    pub generation: u32,
    #[serde(rename = "Policy")]
    pub policy: Policy,
    /// Non-dominated sorting rank assigned by the solver (1 = first front).
    #[serde(rename = "Rank")]
    pub rank: u32,
    #[serde(rename = "Time_Fitness")]
    pub time_fitness: f64,
    #[serde(rename = "Energy_Fitness")]
    pub energy_fitness: f64,
    #[serde(rename = "Crossover_P", default)]
    pub crossover_p: Option<f64>,
    #[serde(rename = "Mutation_P", default)]
    pub mutation_p: Option<f64>,
}

impl FrontRecord {
    pub const REQUIRED_COLUMNS: [&'static str; 6] = [
        "Seed",
        "Generation",
        "Policy",
        "Rank",
        "Time_Fitness",
        "Energy_Fitness",
    ];
}

impl Costed for FrontRecord {
    fn cost(&self) -> CostPoint {
        CostPoint::new(self.time_fitness, self.energy_fitness)
    }
}

// ---------------------------------------------------------------------------
// GanttRecord – one scheduled operation
// ---------------------------------------------------------------------------

/// A single operation placed on a machine. Ids are 1-based as written by the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttRecord {
    #[serde(rename = "Machine_ID")]
    pub machine: u32,
    #[serde(rename = "Job_ID")]
    pub job: u32,
    #[serde(rename = "Operation_ID")]
    pub operation: u32,
    #[serde(rename = "Start_Time")]
    pub start: f64,
    #[serde(rename = "End_Time")]
    pub end: f64,
}

impl GanttRecord {
    pub const REQUIRED_COLUMNS: [&'static str; 5] =
        ["Machine_ID", "Job_ID", "Operation_ID", "Start_Time", "End_Time"];

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

// ---------------------------------------------------------------------------
// FrontTable – every checkpoint row of one instance
// ---------------------------------------------------------------------------

/// The parsed checkpoint file with pre-computed seed / generation indices.
#[derive(Debug, Clone, Default)]
pub struct FrontTable {
    /// All rows, in file order.
    pub records: Vec<FrontRecord>,
    /// Sorted unique seeds.
    pub seeds: Vec<u64>,
    /// Sorted unique generations.
    pub generations: Vec<u32>,
    /// Policies that appear at least once.
    pub policies: BTreeSet<Policy>,
}

impl FrontTable {
    /// Build the indices from the loaded rows.
    pub fn from_records(records: Vec<FrontRecord>) -> Self {
        let seeds: BTreeSet<u64> = records.iter().map(|r| r.seed).collect();
        let generations: BTreeSet<u32> = records.iter().map(|r| r.generation).collect();
        let policies = records.iter().map(|r| r.policy).collect();

        FrontTable {
            records,
            seeds: seeds.into_iter().collect(),
            generations: generations.into_iter().collect(),
            policies,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_policy_names_round_trip() {
        for policy in Policy::ALL {
            assert_eq!(policy.as_str().parse::<Policy>(), Ok(policy));
        }
        assert_eq!("rr_eca".parse::<Policy>(), Ok(Policy::RrEca));
        assert!("EDD".parse::<Policy>().is_err());
    }

    #[test]
    fn test_policy_order_matches_all() {
        let mut shuffled = vec![Policy::RrEca, Policy::Fifo, Policy::RrFifo, Policy::Stp];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Policy::Fifo, Policy::Stp, Policy::RrFifo, Policy::RrEca]
        );
        assert_eq!(Policy::RrLtp.index(), 4);
    }

    #[test]
    fn test_table_indices() {
        let row = |seed, generation, policy| FrontRecord {
            seed,
            generation,
            policy,
            rank: 1,
            time_fitness: 1.0,
            energy_fitness: 1.0,
            crossover_p: None,
            mutation_p: None,
        };
        let table = FrontTable::from_records(vec![
            row(7, 100, Policy::Ltp),
            row(0, 20, Policy::Fifo),
            row(7, 1, Policy::Ltp),
        ]);
        assert_eq!(table.seeds, vec![0, 7]);
        assert_eq!(table.generations, vec![1, 20, 100]);
        assert_eq!(table.policies.len(), 2);
        assert_eq!(table.len(), 3);
    }
}
