use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_notice, render_png, Area, FONT};
use crate::color::ColorMap;
use crate::config::ExperimentConfig;
use crate::data::loader::load_gantt;
use crate::data::model::{GanttRecord, Policy};
use crate::data::DataError;

const FIGURE_SIZE: (u32, u32) = (1500, 2200);

// ---------------------------------------------------------------------------
// Panel state
// ---------------------------------------------------------------------------

/// What one policy's schedule file turned out to contain.
#[derive(Debug, Clone)]
pub enum GanttPanel {
    Missing(PathBuf),
    Empty(PathBuf),
    /// Header present, no operations.
    NoRows(PathBuf),
    /// Any other read failure, already formatted.
    Unreadable(String),
    Schedule(Vec<GanttRecord>),
}

impl GanttPanel {
    /// Load the schedule at `path`; every failure becomes a panel state.
    pub fn load(path: &Path) -> Self {
        match load_gantt(path) {
            Ok(ops) if ops.is_empty() => GanttPanel::NoRows(path.to_path_buf()),
            Ok(ops) => GanttPanel::Schedule(ops),
            Err(DataError::NotFound(p)) => GanttPanel::Missing(p),
            Err(DataError::Empty(p)) => GanttPanel::Empty(p),
            Err(e) => {
                log::warn!("{e}");
                GanttPanel::Unreadable(e.to_string())
            }
        }
    }

    pub fn schedule(&self) -> Option<&[GanttRecord]> {
        match self {
            GanttPanel::Schedule(ops) => Some(ops),
            _ => None,
        }
    }

    /// Caption suffix and message for panels without a schedule.
    fn notice(&self) -> Option<(&'static str, String, RGBColor)> {
        let name = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        };
        match self {
            GanttPanel::Missing(p) => Some(("error", format!("File not found: {}", name(p.as_path())), RED)),
            GanttPanel::Empty(p) => Some(("empty", format!("Empty file: {}", name(p.as_path())), RGBColor(255, 165, 0))),
            GanttPanel::NoRows(p) => Some(("no data", format!("No operations: {}", name(p.as_path())), RGBColor(255, 165, 0))),
            GanttPanel::Unreadable(msg) => Some(("error", msg.clone(), RED)),
            GanttPanel::Schedule(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Figure: one panel per policy
// ---------------------------------------------------------------------------

/// Schedules of every policy for one instance and seed.
#[derive(Debug, Clone)]
pub struct GanttFigure {
    pub instance: String,
    pub seed: u64,
    pub panels: Vec<(Policy, GanttPanel)>,
}

impl GanttFigure {
    /// Read every configured policy's schedule file for `instance` / `seed`.
    pub fn load(config: &ExperimentConfig, instance: &str, seed: u64) -> Self {
        let panels = config
            .policies
            .iter()
            .map(|&policy| {
                let path = config.gantt_path(instance, policy, seed);
                (policy, GanttPanel::load(&path))
            })
            .collect();

        GanttFigure {
            instance: instance.to_string(),
            seed,
            panels,
        }
    }

    /// Whether at least one panel has operations to draw.
    pub fn has_data(&self) -> bool {
        self.panels.iter().any(|(_, p)| p.schedule().is_some())
    }

    fn operations(&self) -> impl Iterator<Item = &GanttRecord> {
        self.panels
            .iter()
            .filter_map(|(_, p)| p.schedule())
            .flatten()
    }

    /// Latest end time over all panels; the shared time axis runs from 0 to here.
    pub fn time_span(&self) -> f64 {
        self.operations().map(|op| op.end).fold(0.0, f64::max)
    }

    /// Job ids over all panels, used for the shared colour map.
    pub fn jobs(&self) -> BTreeSet<u32> {
        self.operations().map(|op| op.job).collect()
    }

    pub fn title(&self) -> String {
        format!("Gantt charts: {} - seed {}", self.instance, self.seed)
    }

    /// Draw the figure and save it as PNG.
    pub fn render(&self, path: &Path) -> Result<()> {
        render_png(path, FIGURE_SIZE, |root| self.draw(root))
    }

    fn draw(&self, root: &Area<'_>) -> Result<()> {
        let area = root.titled(&self.title(), (FONT, 32))?;
        let cells = area.split_evenly((self.panels.len().max(1), 1));

        let colors = ColorMap::new(self.jobs());
        let x_max = self.time_span().max(1.0) * 1.02;
        let last = self.panels.len().saturating_sub(1);
        let mut legend_drawn = false;

        for (i, ((policy, panel), cell)) in self.panels.iter().zip(cells.iter()).enumerate() {
            match panel.schedule() {
                Some(ops) => {
                    let legend = !legend_drawn;
                    draw_schedule(cell, *policy, ops, &colors, x_max, i == last, legend)?;
                    legend_drawn = true;
                }
                None => {
                    if let Some((status, message, color)) = panel.notice() {
                        let caption = format!("Policy: {policy} ({status})");
                        let body = cell.titled(&caption, (FONT, 20).into_font().color(&color))?;
                        draw_notice(&body, &message, &color)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Machines are drawn top to bottom in increasing id order: machine `m` sits on
/// segment `lo + hi - m`.
fn machine_row(machine: u32, lo: u32, hi: u32) -> u32 {
    lo + hi - machine
}

fn draw_schedule(
    cell: &Area<'_>,
    policy: Policy,
    ops: &[GanttRecord],
    colors: &ColorMap<u32>,
    x_max: f64,
    with_time_label: bool,
    with_legend: bool,
) -> Result<()> {
    let machines: BTreeSet<u32> = ops.iter().map(|op| op.machine).collect();
    let (lo, hi) = match (machines.first(), machines.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => return draw_notice(cell, "No operations", &RGBColor(255, 165, 0)),
    };

    let mut chart = ChartBuilder::on(cell)
        .caption(format!("Policy: {policy}"), (FONT, 20))
        .margin(10)
        .x_label_area_size(if with_time_label { 40 } else { 25 })
        .y_label_area_size(60)
        // Integer ranges are inclusive; a lone machine still needs a non-empty span.
        .build_cartesian_2d(0f64..x_max, (lo..hi.max(lo + 1)).into_segmented())?;

    let label_machine = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(row) if (lo..=hi).contains(row) => machine_row(*row, lo, hi).to_string(),
        _ => String::new(),
    };
    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_y_mesh()
            .y_desc("Machine ID")
            .y_label_formatter(&label_machine)
            .light_line_style(BLACK.mix(0.05));
        if with_time_label {
            mesh.x_desc("Time");
        }
        mesh.draw()?;
    }

    // Every job of the figure gets a series, so the legend lists jobs that
    // only run in other panels too.
    for (&job, rgb) in colors.legend_entries() {
        let fill = RGBColor::from(rgb);
        let bars = ops.iter().filter(move |op| op.job == job).map(move |op| {
            let row = machine_row(op.machine, lo, hi);
            Rectangle::new(
                [
                    (op.start, SegmentValue::Exact(row)),
                    (op.end, SegmentValue::Exact(row + 1)),
                ],
                fill.mix(0.8).filled(),
            )
        });
        let series = chart.draw_series(bars)?;
        if with_legend {
            series
                .label(format!("Job {job}"))
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
        }
    }

    chart.draw_series(ops.iter().map(|op| {
        let row = machine_row(op.machine, lo, hi);
        Rectangle::new(
            [
                (op.start, SegmentValue::Exact(row)),
                (op.end, SegmentValue::Exact(row + 1)),
            ],
            BLACK.stroke_width(1),
        )
    }))?;

    let label_style = TextStyle::from((FONT, 12).into_font())
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(ops.iter().map(|op| {
        let row = machine_row(op.machine, lo, hi);
        Text::new(
            format!("J{},O{}", op.job, op.operation),
            ((op.start + op.end) / 2.0, SegmentValue::CenterOf(row)),
            label_style.clone(),
        )
    }))?;

    if with_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Machine_ID,Job_ID,Operation_ID,Start_Time,End_Time\n";

    fn config_in(dir: &Path) -> ExperimentConfig {
        ExperimentConfig {
            results_dir: dir.to_path_buf(),
            policies: vec![Policy::Fifo, Policy::Ltp, Policy::Stp, Policy::RrEca],
            ..ExperimentConfig::default()
        }
    }

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::File::create(path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
    }

    #[test]
    fn test_panel_states() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        write(
            &config.gantt_path("Eg1", Policy::Fifo, 3),
            &format!("{HEADER}1,1,1,0,4\n2,2,1,0,6.5\n1,2,2,6.5,9\n"),
        );
        write(&config.gantt_path("Eg1", Policy::Ltp, 3), "");
        write(&config.gantt_path("Eg1", Policy::Stp, 3), HEADER);

        let figure = GanttFigure::load(&config, "Eg1", 3);
        let states: Vec<&GanttPanel> = figure.panels.iter().map(|(_, p)| p).collect();

        assert!(matches!(states[0], GanttPanel::Schedule(ops) if ops.len() == 3));
        assert!(matches!(states[1], GanttPanel::Empty(_)));
        assert!(matches!(states[2], GanttPanel::NoRows(_)));
        assert!(matches!(states[3], GanttPanel::Missing(_)));

        assert!(figure.has_data());
        assert_eq!(figure.time_span(), 9.0);
        assert_eq!(figure.jobs().into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(figure.title(), "Gantt charts: Eg1 - seed 3");
    }

    #[test]
    fn test_figure_without_data() {
        let dir = tempfile::tempdir().unwrap();
        let figure = GanttFigure::load(&config_in(dir.path()), "Eg2", 0);
        assert!(!figure.has_data());
        assert_eq!(figure.time_span(), 0.0);
        assert!(figure.jobs().is_empty());
    }

    #[test]
    fn test_render_notice_only_figure() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_in(dir.path());
        write(&config.gantt_path("Eg2", Policy::Ltp, 0), "");
        write(&config.gantt_path("Eg2", Policy::Stp, 0), HEADER);

        let figure = GanttFigure::load(&config, "Eg2", 0);
        assert!(!figure.has_data());

        let out = dir.path().join("plots").join("gantt_Eg2_seed_0.png");
        figure.render(&out)?;
        assert_eq!(image::image_dimensions(&out)?, FIGURE_SIZE);
        Ok(())
    }

    #[test]
    fn test_render_schedule_figure() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_in(dir.path());
        write(
            &config.gantt_path("Eg1", Policy::Fifo, 5),
            &format!("{HEADER}1,1,1,0,4\n2,2,1,0,6\n"),
        );
        // Job 3 only runs under STP.
        write(
            &config.gantt_path("Eg1", Policy::Stp, 5),
            &format!("{HEADER}1,3,1,0,5\n3,1,1,5,8\n"),
        );

        let figure = GanttFigure::load(&config, "Eg1", 5);
        assert_eq!(figure.jobs().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);

        let out = dir.path().join("gantt.png");
        figure.render(&out)?;
        assert_eq!(image::image_dimensions(&out)?, FIGURE_SIZE);
        Ok(())
    }

    #[test]
    fn test_machine_rows_run_top_down() {
        // Machine 1 is drawn on the highest segment.
        assert_eq!(machine_row(1, 1, 4), 4);
        assert_eq!(machine_row(4, 1, 4), 1);
        assert_eq!(machine_row(2, 2, 2), 2);
    }
}
