//! Hypervolume indicator and the per-generation report.
//!
//! The indicator is exact for two minimised objectives: the area dominated
//! by a point set and bounded above by a reference point. The report groups
//! first-rank rows by (seed, generation, policy), computes one hypervolume
//! per group and summarises each (generation, policy) cell over seeds.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::filter::{group_by_run, selected, with_rank, PolicySelection};
use crate::data::model::{FrontRecord, Policy};
use crate::pareto::CostPoint;

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

/// Area dominated by `points` inside the box bounded by `reference`.
///
/// Points that are not strictly better than the reference in both
/// objectives add nothing. Dominated points and duplicates are absorbed by
/// the sweep, so the input need not be a front.
pub fn hypervolume(points: &[CostPoint], reference: CostPoint) -> f64 {
    let mut inside: Vec<CostPoint> = points
        .iter()
        .copied()
        .filter(|p| p.time < reference.time && p.energy < reference.energy)
        .collect();

    inside.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.energy.total_cmp(&b.energy)));

    let mut volume = 0.0;
    let mut ceiling = reference.energy;
    for p in inside {
        if p.energy < ceiling {
            volume += (reference.time - p.time) * (ceiling - p.energy);
            ceiling = p.energy;
        }
    }
    volume
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Spread of one (generation, policy) cell over seeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HvStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; zero for a single sample.
    pub std: f64,
    pub samples: usize,
}

impl HvStats {
    /// `None` for an empty slice.
    pub fn from_samples(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        Some(HvStats {
            min,
            max,
            mean,
            std,
            samples: n,
        })
    }

    /// The combined `mean (std)` cell.
    pub fn mean_std_label(&self) -> String {
        format!("{:.2} ({:.2})", self.mean, self.std)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

const STAT_COLUMNS: [&str; 3] = ["min", "max", "Prom (desv)"];

/// Hypervolume statistics per generation and policy.
#[derive(Debug, Clone, Default)]
pub struct HypervolumeReport {
    cells: BTreeMap<u32, BTreeMap<Policy, HvStats>>,
}

impl HypervolumeReport {
    /// Build the report from raw checkpoint rows.
    ///
    /// Only rows with the given `rank` and one of `policies` take part.
    /// Returns an empty report when none do.
    pub fn from_records(
        records: &[FrontRecord],
        rank: u32,
        policies: &[Policy],
        reference: CostPoint,
    ) -> Self {
        let enabled: PolicySelection = policies.iter().copied().collect();
        let ranked = selected(&with_rank(records, rank), &enabled);

        let mut samples: BTreeMap<(u32, Policy), Vec<f64>> = BTreeMap::new();
        for (key, points) in group_by_run(&ranked) {
            samples
                .entry((key.generation, key.policy))
                .or_default()
                .push(hypervolume(&points, reference));
        }

        let mut cells: BTreeMap<u32, BTreeMap<Policy, HvStats>> = BTreeMap::new();
        for ((generation, policy), values) in samples {
            if let Some(stats) = HvStats::from_samples(&values) {
                cells.entry(generation).or_default().insert(policy, stats);
            }
        }

        HypervolumeReport { cells }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn generations(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.keys().copied()
    }

    pub fn get(&self, generation: u32, policy: Policy) -> Option<&HvStats> {
        self.cells.get(&generation)?.get(&policy)
    }

    /// Policies present in any generation, in canonical order.
    pub fn policies(&self) -> Vec<Policy> {
        let present: BTreeSet<Policy> = self
            .cells
            .values()
            .flat_map(|row| row.keys().copied())
            .collect();
        present.into_iter().collect()
    }

    /// Write the pivot table: three header rows, then one row per generation.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let policies = self.policies();
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);

        let mut stat_header = vec![String::new()];
        let mut policy_header = vec!["Policy".to_string()];
        for policy in &policies {
            for stat in STAT_COLUMNS {
                stat_header.push(stat.to_string());
                policy_header.push(policy.to_string());
            }
        }
        let mut generation_header = vec!["Generation".to_string()];
        generation_header.resize(stat_header.len(), String::new());

        writer.write_record(&stat_header)?;
        writer.write_record(&policy_header)?;
        writer.write_record(&generation_header)?;

        for (generation, row) in &self.cells {
            let mut record = vec![generation.to_string()];
            for policy in &policies {
                match row.get(policy) {
                    Some(stats) => {
                        record.push(format!("{:?}", stats.min));
                        record.push(format!("{:?}", stats.max));
                        record.push(stats.mean_std_label());
                    }
                    None => record.extend(std::iter::repeat(String::new()).take(STAT_COLUMNS.len())),
                }
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write the pivot table to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        self.write_csv(std::io::BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const REF: CostPoint = CostPoint::new(3.0, 3.0);

    fn pts(raw: &[(f64, f64)]) -> Vec<CostPoint> {
        raw.iter().copied().map(CostPoint::from).collect()
    }

    #[test]
    fn test_single_point() {
        assert_eq!(hypervolume(&pts(&[(1.0, 1.0)]), REF), 4.0);
    }

    #[test]
    fn test_staircase() {
        assert_eq!(hypervolume(&pts(&[(1.0, 2.0), (2.0, 1.0)]), REF), 3.0);
        // Input order does not matter.
        assert_eq!(hypervolume(&pts(&[(2.0, 1.0), (1.0, 2.0)]), REF), 3.0);
    }

    #[test]
    fn test_empty_and_outside_points() {
        assert_eq!(hypervolume(&[], REF), 0.0);
        assert_eq!(hypervolume(&pts(&[(3.0, 1.0), (4.0, 0.0), (1.0, 3.0)]), REF), 0.0);
        assert_eq!(hypervolume(&pts(&[(5.0, 0.5), (1.0, 1.0)]), REF), 4.0);
    }

    #[test]
    fn test_dominated_and_duplicate_points_add_nothing() {
        let front = pts(&[(1.0, 2.0), (2.0, 1.0)]);
        let noisy = pts(&[(1.0, 2.0), (2.5, 2.5), (2.0, 1.0), (1.0, 2.0), (2.0, 2.0)]);
        assert_eq!(hypervolume(&noisy, REF), hypervolume(&front, REF));
    }

    #[test]
    fn test_stats() {
        let single = HvStats::from_samples(&[5.0]).unwrap();
        assert_eq!((single.min, single.max, single.mean, single.std), (5.0, 5.0, 5.0, 0.0));

        let stats = HvStats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.mean, 5.0);
        assert!((stats.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.mean_std_label(), "5.00 (2.14)");

        assert!(HvStats::from_samples(&[]).is_none());
    }

    fn row(seed: u64, generation: u32, policy: Policy, rank: u32, t: f64, e: f64) -> FrontRecord {
        FrontRecord {
            seed,
            generation,
            policy,
            rank,
            time_fitness: t,
            energy_fitness: e,
            crossover_p: Some(80.0),
            mutation_p: Some(10.0),
        }
    }

    #[test]
    fn test_report_aggregates_over_seeds() {
        let reference = CostPoint::new(10.0, 10.0);
        let records = vec![
            row(0, 1, Policy::Fifo, 1, 5.0, 5.0),  // 25
            row(1, 1, Policy::Fifo, 1, 4.0, 4.0),  // 36
            row(1, 1, Policy::Fifo, 2, 0.0, 0.0),  // ignored rank
            row(0, 1, Policy::RrEca, 1, 8.0, 8.0), // 4
            row(0, 20, Policy::Fifo, 1, 2.0, 5.0), // 40
        ];

        let report = HypervolumeReport::from_records(&records, 1, &Policy::ALL, reference);
        assert_eq!(report.generations().collect::<Vec<_>>(), vec![1, 20]);
        assert_eq!(report.policies(), vec![Policy::Fifo, Policy::RrEca]);

        let fifo = report.get(1, Policy::Fifo).unwrap();
        assert_eq!((fifo.min, fifo.max, fifo.mean, fifo.samples), (25.0, 36.0, 30.5, 2));
        assert_eq!(report.get(20, Policy::Fifo).unwrap().std, 0.0);
        assert!(report.get(20, Policy::RrEca).is_none());
    }

    #[test]
    fn test_report_limited_to_configured_policies() {
        let reference = CostPoint::new(10.0, 10.0);
        let records = vec![
            row(0, 1, Policy::Fifo, 1, 5.0, 5.0),
            row(0, 1, Policy::Ltp, 1, 4.0, 4.0),
            row(0, 1, Policy::RrEca, 1, 8.0, 8.0),
        ];

        let report =
            HypervolumeReport::from_records(&records, 1, &[Policy::RrEca, Policy::Fifo], reference);
        assert_eq!(report.policies(), vec![Policy::Fifo, Policy::RrEca]);
        assert!(report.get(1, Policy::Ltp).is_none());

        let none = HypervolumeReport::from_records(&records, 1, &[Policy::Stp], reference);
        assert!(none.is_empty());
    }

    #[test]
    fn test_report_without_matching_rank_is_empty() {
        let records = vec![row(0, 1, Policy::Fifo, 2, 1.0, 1.0)];
        let report = HypervolumeReport::from_records(&records, 1, &Policy::ALL, REF);
        assert!(report.is_empty());
    }

    #[test]
    fn test_pivot_csv_layout() -> anyhow::Result<()> {
        let reference = CostPoint::new(10.0, 10.0);
        let records = vec![
            row(0, 1, Policy::RrEca, 1, 8.0, 8.0),
            row(0, 1, Policy::Fifo, 1, 5.0, 5.0),
            row(0, 20, Policy::Fifo, 1, 2.0, 5.0),
        ];
        let report = HypervolumeReport::from_records(&records, 1, &Policy::ALL, reference);

        let mut out = Vec::new();
        report.write_csv(&mut out)?;
        let text = String::from_utf8(out)?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], ",min,max,Prom (desv),min,max,Prom (desv)");
        assert_eq!(lines[1], "Policy,FIFO,FIFO,FIFO,RR_ECA,RR_ECA,RR_ECA");
        assert_eq!(lines[2], "Generation,,,,,,");
        assert_eq!(lines[3], "1,25.0,25.0,25.00 (0.00),4.0,4.0,4.00 (0.00)");
        assert_eq!(lines[4], "20,40.0,40.0,40.00 (0.00),,,");
        assert_eq!(lines.len(), 5);
        Ok(())
    }
}
