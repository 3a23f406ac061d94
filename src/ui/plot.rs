use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};

use rusty_pareto::data::model::Policy;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Front scatter (central panel)
// ---------------------------------------------------------------------------

/// Render the current slice, one series per policy.
pub fn front_plot(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a checkpoint file to view fronts  (File → Open…)");
        });
        return;
    }

    Plot::new("front_plot")
        .legend(Legend::default())
        .x_axis_label("Time (makespan)")
        .y_axis_label("Total energy")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for policy in Policy::ALL {
                let xy: Vec<[f64; 2]> = state
                    .visible_for(policy)
                    .map(|r| [r.time_fitness, r.energy_fitness])
                    .collect();
                if xy.is_empty() {
                    continue;
                }

                let color = Color32::from(state.color_map.color_for(&policy));
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .name(policy.as_str())
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Hypervolume table (bottom panel)
// ---------------------------------------------------------------------------

pub fn hypervolume_table(ui: &mut Ui, state: &AppState) {
    if state.volumes.is_empty() {
        ui.label("No visible points.");
        return;
    }

    let [rx, ry] = state.config.reference_point;
    ui.label(format!("Hypervolume against reference ({rx}, {ry})"));

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Policy");
            });
            header.col(|ui| {
                ui.strong("Points");
            });
            header.col(|ui| {
                ui.strong("Hypervolume");
            });
        })
        .body(|mut body| {
            for volume in &state.volumes {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let color = Color32::from(state.color_map.color_for(&volume.policy));
                        ui.colored_label(color, volume.policy.as_str());
                    });
                    row.col(|ui| {
                        ui.label(volume.points.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", volume.hypervolume));
                    });
                });
            }
        });
}
