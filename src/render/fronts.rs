use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_notice, grid_shape, render_png, Area, FONT};
use crate::color::ColorMap;
use crate::data::filter::{for_seed, selected, FrontMode, PolicySelection};
use crate::data::model::{FrontRecord, Policy};

const COLUMNS: usize = 5;
const CELL_SIZE: (u32, u32) = (400, 380);
const TITLE_HEIGHT: u32 = 70;
const LEGEND_HEIGHT: u32 = 70;

// ---------------------------------------------------------------------------
// Shared axis bounds
// ---------------------------------------------------------------------------

/// Axis ranges shared by every cell of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub time: (f64, f64),
    pub energy: (f64, f64),
}

impl Bounds {
    /// Tight bounds of the records, padded by 5% of the span on each side.
    /// `None` when there are no records.
    pub fn around<'a, I: IntoIterator<Item = &'a FrontRecord>>(records: I) -> Option<Self> {
        let mut iter = records.into_iter();
        let first = iter.next()?;
        let mut time = (first.time_fitness, first.time_fitness);
        let mut energy = (first.energy_fitness, first.energy_fitness);
        for r in iter {
            time = (time.0.min(r.time_fitness), time.1.max(r.time_fitness));
            energy = (energy.0.min(r.energy_fitness), energy.1.max(r.energy_fitness));
        }
        Some(Bounds {
            time: pad(time),
            energy: pad(energy),
        })
    }
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    let margin = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - margin, hi + margin)
}

// ---------------------------------------------------------------------------
// Grid of seeds
// ---------------------------------------------------------------------------

/// One instance's fronts at one generation, one cell per seed.
#[derive(Debug, Clone)]
pub struct FrontGrid<'a> {
    pub instance: &'a str,
    pub generation: u32,
    pub mode: FrontMode,
    /// Seed and the points to plot for it, mode already applied.
    pub cells: Vec<(u64, CellContent<'a>)>,
    pub policies: Vec<Policy>,
    pub bounds: Bounds,
}

/// What a single seed cell shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent<'a> {
    /// The seed has no rows at this generation.
    NoData,
    /// Rows exist but the mode removed them all.
    FullyDominated,
    Points(Vec<&'a FrontRecord>),
}

impl<'a> FrontGrid<'a> {
    /// Build the grid from the rank-filtered rows of one generation.
    ///
    /// Rows of policies outside `policies` are dropped before anything else,
    /// so they never reach the axes or the global front. Returns `None` when
    /// nothing is left.
    pub fn new(
        instance: &'a str,
        generation: u32,
        mode: FrontMode,
        slice: &[&'a FrontRecord],
        seeds: &[u64],
        policies: &[Policy],
    ) -> Option<Self> {
        let enabled: PolicySelection = policies.iter().copied().collect();
        let slice = selected(slice, &enabled);
        let bounds = Bounds::around(slice.iter().copied())?;

        let cells = seeds
            .iter()
            .map(|&seed| {
                let rows = for_seed(&slice, seed);
                let content = if rows.is_empty() {
                    CellContent::NoData
                } else {
                    let shown = mode.apply(&rows);
                    if shown.is_empty() {
                        CellContent::FullyDominated
                    } else {
                        CellContent::Points(shown)
                    }
                };
                (seed, content)
            })
            .collect();

        Some(FrontGrid {
            instance,
            generation,
            mode,
            cells,
            policies: policies.to_vec(),
            bounds,
        })
    }

    pub fn title(&self) -> String {
        format!(
            "{} - {} - Gen {}",
            self.instance,
            self.mode.title(),
            self.generation
        )
    }

    /// Pixel size: fixed-size cells plus title and legend strips.
    pub fn size(&self) -> (u32, u32) {
        let (rows, cols) = grid_shape(self.cells.len(), COLUMNS);
        (
            cols as u32 * CELL_SIZE.0,
            rows as u32 * CELL_SIZE.1 + TITLE_HEIGHT + LEGEND_HEIGHT,
        )
    }
}

/// Draw the grid and save it as PNG.
pub fn render_front_grid(grid: &FrontGrid<'_>, path: &Path) -> Result<()> {
    render_png(path, grid.size(), |root| draw_grid(grid, root))
}

fn draw_grid(grid: &FrontGrid<'_>, root: &Area<'_>) -> Result<()> {
    let colors = ColorMap::new(Policy::ALL);

    let body = root.titled(&grid.title(), (FONT, 36))?;
    let legend_top = body.dim_in_pixel().1 as i32 - LEGEND_HEIGHT as i32;
    let (cells_area, legend_area) = body.split_vertically(legend_top);

    let (rows, cols) = grid_shape(grid.cells.len(), COLUMNS);
    let areas = cells_area.split_evenly((rows, cols));

    for (i, ((seed, content), area)) in grid.cells.iter().zip(areas.iter()).enumerate() {
        let bottom_row = i + cols >= grid.cells.len();
        let left_column = i % cols == 0;
        draw_cell(area, *seed, content, &grid.bounds, &colors, bottom_row, left_column)?;
    }

    draw_legend(&legend_area, &grid.policies, &colors)
}

fn draw_cell(
    area: &Area<'_>,
    seed: u64,
    content: &CellContent<'_>,
    bounds: &Bounds,
    colors: &ColorMap<Policy>,
    bottom_row: bool,
    left_column: bool,
) -> Result<()> {
    let caption = format!("Seed {seed}");
    let points = match content {
        CellContent::NoData => {
            let body = area.titled(&caption, (FONT, 18))?;
            return draw_notice(&body, "No data", &RED);
        }
        CellContent::FullyDominated => {
            let body = area.titled(&caption, (FONT, 18))?;
            return draw_notice(&body, "Fully dominated", &RGBColor(128, 128, 128));
        }
        CellContent::Points(points) => points,
    };

    let mut chart = ChartBuilder::on(area)
        .caption(&caption, (FONT, 18))
        .margin(8)
        .x_label_area_size(if bottom_row { 40 } else { 20 })
        .y_label_area_size(if left_column { 60 } else { 45 })
        .build_cartesian_2d(bounds.time.0..bounds.time.1, bounds.energy.0..bounds.energy.1)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(4).y_labels(4).light_line_style(BLACK.mix(0.06));
        if bottom_row {
            mesh.x_desc("Time (makespan)");
        }
        if left_column {
            mesh.y_desc("Total energy");
        }
        mesh.draw()?;
    }

    chart.draw_series(points.iter().map(|r| {
        let fill = RGBColor::from(colors.color_for(&r.policy));
        Circle::new((r.time_fitness, r.energy_fitness), 5, fill.mix(0.9).filled())
    }))?;
    chart.draw_series(
        points
            .iter()
            .map(|r| Circle::new((r.time_fitness, r.energy_fitness), 5, BLACK.stroke_width(1))),
    )?;
    Ok(())
}

fn draw_legend(area: &Area<'_>, policies: &[Policy], colors: &ColorMap<Policy>) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let slot = w as i32 / policies.len().max(1) as i32;
    let y = h as i32 / 2;
    let style = TextStyle::from((FONT, 20).into_font()).pos(Pos::new(HPos::Left, VPos::Center));

    for (i, policy) in policies.iter().enumerate() {
        let x = slot * i as i32 + slot / 3;
        let fill = RGBColor::from(colors.color_for(policy));
        area.draw(&Circle::new((x, y), 8, fill.filled()))?;
        area.draw(&Circle::new((x, y), 8, BLACK.stroke_width(1)))?;
        area.draw_text(policy.as_str(), &style, (x + 16, y))?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::filter::{at_generation, with_rank};

    fn row(seed: u64, policy: Policy, t: f64, e: f64) -> FrontRecord {
        FrontRecord {
            seed,
            generation: 100,
            policy,
            rank: 1,
            time_fitness: t,
            energy_fitness: e,
            crossover_p: None,
            mutation_p: None,
        }
    }

    fn records() -> Vec<FrontRecord> {
        vec![
            row(0, Policy::Fifo, 100.0, 500.0),
            row(0, Policy::Ltp, 90.0, 480.0),
            row(0, Policy::Ltp, 120.0, 400.0),
            row(1, Policy::Stp, 200.0, 300.0),
        ]
    }

    #[test]
    fn test_bounds_are_padded() {
        let all = records();
        let bounds = Bounds::around(&all).unwrap();
        assert!((bounds.time.0 - 84.5).abs() < 1e-9);
        assert!((bounds.time.1 - 205.5).abs() < 1e-9);
        assert!((bounds.energy.0 - 290.0).abs() < 1e-9);
        assert!((bounds.energy.1 - 510.0).abs() < 1e-9);

        let lone = [row(0, Policy::Fifo, 0.0, 10.0)];
        let bounds = Bounds::around(&lone).unwrap();
        assert!(bounds.time.0 < 0.0 && bounds.time.1 > 0.0);
        assert!(bounds.energy.0 < 10.0 && bounds.energy.1 > 10.0);

        assert!(Bounds::around(&Vec::<FrontRecord>::new()).is_none());
    }

    #[test]
    fn test_individual_grid_cells() {
        let all = records();
        let slice = at_generation(&with_rank(&all, 1), 100);
        let grid = FrontGrid::new("Eg1", 100, FrontMode::Individual, &slice, &[0, 1, 2], &Policy::ALL)
            .unwrap();

        assert_eq!(grid.cells.len(), 3);
        assert!(matches!(&grid.cells[0].1, CellContent::Points(p) if p.len() == 3));
        assert!(matches!(&grid.cells[1].1, CellContent::Points(p) if p.len() == 1));
        assert_eq!(grid.cells[2].1, CellContent::NoData);
        assert_eq!(grid.title(), "Eg1 - Per-policy comparison - Gen 100");
    }

    #[test]
    fn test_global_grid_drops_dominated_points() {
        let all = records();
        let slice = at_generation(&with_rank(&all, 1), 100);
        let grid =
            FrontGrid::new("Eg1", 100, FrontMode::Global, &slice, &[0], &Policy::ALL).unwrap();

        match &grid.cells[0].1 {
            CellContent::Points(p) => {
                let kept: Vec<(Policy, f64)> = p.iter().map(|r| (r.policy, r.time_fitness)).collect();
                assert_eq!(kept, vec![(Policy::Ltp, 90.0), (Policy::Ltp, 120.0)]);
            }
            other => panic!("unexpected cell: {other:?}"),
        }
    }

    #[test]
    fn test_grid_keeps_configured_policies_only() {
        let all = records();
        let slice = at_generation(&with_rank(&all, 1), 100);

        let grid =
            FrontGrid::new("Eg1", 100, FrontMode::Individual, &slice, &[0, 1], &[Policy::Fifo])
                .unwrap();
        assert!(matches!(&grid.cells[0].1, CellContent::Points(p)
            if p.len() == 1 && p[0].policy == Policy::Fifo));
        assert_eq!(grid.cells[1].1, CellContent::NoData);
        assert_eq!(grid.policies, vec![Policy::Fifo]);
        // Bounds follow the FIFO point alone.
        assert!(grid.bounds.time.0 < 100.0 && grid.bounds.time.1 > 100.0);
        assert!(grid.bounds.energy.0 > 400.0);

        // LTP dominates FIFO only when it takes part.
        let global =
            FrontGrid::new("Eg1", 100, FrontMode::Global, &slice, &[0], &[Policy::Fifo]).unwrap();
        assert!(matches!(&global.cells[0].1, CellContent::Points(p) if p.len() == 1));

        assert!(FrontGrid::new("Eg1", 100, FrontMode::Global, &slice, &[0], &[Policy::RrEca])
            .is_none());
    }

    #[test]
    fn test_empty_slice_has_no_grid() {
        assert!(FrontGrid::new("Eg1", 100, FrontMode::Global, &[], &[0], &Policy::ALL).is_none());
    }

    #[test]
    fn test_render_grid_png() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let all = records();
        let slice = at_generation(&with_rank(&all, 1), 100);

        for mode in FrontMode::ALL {
            let grid = FrontGrid::new("Eg1", 100, mode, &slice, &[0, 1, 2], &Policy::ALL).unwrap();
            let out = dir.path().join(format!("pareto_Eg1_{}.png", mode.file_suffix()));
            render_front_grid(&grid, &out)?;
            assert_eq!(image::image_dimensions(&out)?, grid.size());
        }
        Ok(())
    }

    #[test]
    fn test_grid_size() {
        let all = records();
        let slice = at_generation(&with_rank(&all, 1), 100);
        let seeds: Vec<u64> = (0..30).collect();
        let grid =
            FrontGrid::new("Eg1", 100, FrontMode::Individual, &slice, &seeds, &Policy::ALL).unwrap();
        assert_eq!(grid.size(), (2000, 6 * 380 + 140));
    }
}
