//! Batch drivers: one pass over every configured instance.
//!
//! A failure on one instance is logged and the next instance is processed.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::ExperimentConfig;
use crate::data::filter::{at_generation, with_rank, FrontMode};
use crate::data::loader::load_fronts;
use crate::hypervolume::HypervolumeReport;
use crate::render::{render_front_grid, FrontGrid, GanttFigure};

/// Outcome of one batch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files written.
    pub written: Vec<PathBuf>,
    /// Instances skipped because their inputs were missing or held nothing usable.
    pub skipped: Vec<String>,
    /// Instances that failed part-way.
    pub failed: Vec<String>,
}

impl Summary {
    fn merge(&mut self, other: Summary) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }
}

fn for_each_instance<F>(config: &ExperimentConfig, task: &str, mut run: F) -> Summary
where
    F: FnMut(&str, &mut Summary) -> Result<()>,
{
    let mut summary = Summary::default();
    for instance in &config.instances {
        log::info!("[{instance}] {task}");
        if let Err(e) = run(instance, &mut summary) {
            log::error!("[{instance}] {task} failed: {e:#}");
            summary.failed.push(instance.clone());
        }
    }
    summary
}

// ---------------------------------------------------------------------------
// Gantt charts
// ---------------------------------------------------------------------------

/// One Gantt figure per instance and seed.
pub fn gantt(config: &ExperimentConfig) -> Summary {
    for_each_instance(config, "gantt charts", |instance, summary| {
        let out_dir = config.plot_dir(instance);
        for &seed in &config.seeds {
            let figure = GanttFigure::load(config, instance, seed);
            if !figure.has_data() {
                log::warn!("[{instance}] no schedule data for seed {seed}");
            }

            let path = out_dir.join(format!("gantt_{instance}_seed_{seed}.png"));
            figure
                .render(&path)
                .with_context(|| format!("seed {seed}"))?;
            log::debug!("saved {}", path.display());
            summary.written.push(path);
        }
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Pareto fronts
// ---------------------------------------------------------------------------

/// The individual and global front grids per instance.
pub fn fronts(config: &ExperimentConfig) -> Summary {
    for_each_instance(config, "pareto fronts", |instance, summary| {
        let path = config.fronts_path(instance);
        let table = match load_fronts(&path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("[{instance}] skipping: {e}");
                summary.skipped.push(instance.to_string());
                return Ok(());
            }
        };

        let ranked = with_rank(&table.records, config.rank);
        let slice = at_generation(&ranked, config.generation);

        for mode in FrontMode::ALL {
            let Some(grid) = FrontGrid::new(
                instance,
                config.generation,
                mode,
                &slice,
                &config.seeds,
                &config.policies,
            ) else {
                log::warn!(
                    "[{instance}] no rank {} rows at generation {} for the configured policies",
                    config.rank,
                    config.generation
                );
                summary.skipped.push(instance.to_string());
                return Ok(());
            };

            log::info!("[{instance}] rendering {} view", mode.file_suffix());
            let out = config
                .plot_dir(instance)
                .join(format!("pareto_{instance}_{}.png", mode.file_suffix()));
            render_front_grid(&grid, &out).with_context(|| format!("{mode} view"))?;
            summary.written.push(out);
        }
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Hypervolume report
// ---------------------------------------------------------------------------

/// `hypervolume_report.csv` per instance.
pub fn hypervolume(config: &ExperimentConfig) -> Summary {
    for_each_instance(config, "hypervolume report", |instance, summary| {
        let path = config.fronts_path(instance);
        let table = match load_fronts(&path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("[{instance}] skipping: {e}");
                summary.skipped.push(instance.to_string());
                return Ok(());
            }
        };

        let report = HypervolumeReport::from_records(
            &table.records,
            config.rank,
            &config.policies,
            config.reference(),
        );
        if report.is_empty() {
            log::warn!("[{instance}] no rank {} rows for the configured policies", config.rank);
            summary.skipped.push(instance.to_string());
            return Ok(());
        }

        let out = config.report_path(instance);
        report.save(&out)?;
        log::info!("[{instance}] report saved to {}", out.display());
        summary.written.push(out);
        Ok(())
    })
}

/// Gantt charts, fronts and the hypervolume report, in that order.
pub fn all(config: &ExperimentConfig) -> Summary {
    let mut summary = gantt(config);
    summary.merge(fronts(config));
    summary.merge(hypervolume(config));
    summary
}
