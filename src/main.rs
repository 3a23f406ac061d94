mod app;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::RustyParetoApp;
use clap::{Parser, Subcommand};
use eframe::egui;
use rusty_pareto::config::ExperimentConfig;
use rusty_pareto::pipeline::{self, Summary};

#[derive(Parser)]
#[command(version, about = "Post-processing for the job-shop scheduling experiment")]
struct Cli {
    /// JSON experiment configuration; built-in defaults otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the results directory.
    #[arg(long, global = true)]
    results: Option<PathBuf>,
    /// Override the plots directory.
    #[arg(long, global = true)]
    plots: Option<PathBuf>,
    /// Restrict processing to these instances (repeatable).
    #[arg(long = "instance", global = true)]
    instances: Vec<String>,
    /// Checkpoint generation plotted in the front grids.
    #[arg(long, global = true)]
    generation: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render one Gantt figure per instance and seed.
    Gantt,
    /// Render the individual and global front grids.
    Fronts,
    /// Write the hypervolume report for every instance.
    Hypervolume,
    /// Gantt charts, fronts and hypervolume report.
    All,
    /// Open the interactive viewer.
    View {
        /// Checkpoint CSV to open on start.
        file: Option<PathBuf>,
    },
}

impl Cli {
    fn experiment(&self) -> anyhow::Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_file(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(dir) = &self.results {
            config.results_dir = dir.clone();
        }
        if let Some(dir) = &self.plots {
            config.plots_dir = dir.clone();
        }
        if !self.instances.is_empty() {
            config.instances = self.instances.clone();
        }
        if let Some(generation) = self.generation {
            config.generation = generation;
        }
        Ok(config)
    }
}

fn report(task: &str, summary: &Summary) {
    log::info!(
        "{task}: {} file(s) written, {} skipped, {} failed",
        summary.written.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    for instance in &summary.failed {
        log::warn!("{task}: instance {instance} did not complete");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.experiment()?;

    match cli.command {
        Some(Command::Gantt) => report("gantt", &pipeline::gantt(&config)),
        Some(Command::Fronts) => report("fronts", &pipeline::fronts(&config)),
        Some(Command::Hypervolume) => report("hypervolume", &pipeline::hypervolume(&config)),
        Some(Command::All) => report("all", &pipeline::all(&config)),
        Some(Command::View { file }) => view(config, file)?,
        None => view(config, None)?,
    }
    Ok(())
}

fn view(config: ExperimentConfig, file: Option<PathBuf>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Pareto – Front Viewer",
        options,
        Box::new(move |_cc| {
            let mut app = RustyParetoApp::new(config);
            if let Some(path) = file {
                app.state.open(&path);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the viewer")
}
