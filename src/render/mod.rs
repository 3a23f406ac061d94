/// Headless chart rendering.
///
/// Figures are drawn with plotters into an in-memory RGB buffer, which is
/// then encoded as PNG:
/// ```text
///   records ──► figure (gantt / fronts) ──► BitMapBackend buffer ──► image::RgbImage ──► .png
/// ```

pub mod fronts;
pub mod gantt;

use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub use fronts::{render_front_grid, Bounds, FrontGrid};
pub use gantt::{GanttFigure, GanttPanel};

pub(crate) type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub(crate) const FONT: &str = "sans-serif";

/// Draw a figure of the given pixel size and write it to `path` as PNG.
pub(crate) fn render_png<F>(path: &Path, (width, height): (u32, u32), draw: F) -> Result<()>
where
    F: FnOnce(&Area<'_>) -> Result<()>,
{
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .context("bitmap buffer does not match the figure size")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("saving {}", path.display()))?;
    Ok(())
}

/// Centered message in place of a chart.
pub(crate) fn draw_notice(area: &Area<'_>, message: &str, color: &RGBColor) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let style = TextStyle::from((FONT, 18).into_font())
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw_text(message, &style, (w as i32 / 2, h as i32 / 2))?;
    Ok(())
}

/// Rows and columns needed to lay out `n` cells `columns` wide.
pub fn grid_shape(n: usize, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    (n.div_ceil(columns).max(1), columns)
}
