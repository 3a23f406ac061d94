use eframe::egui;
use rusty_pareto::config::ExperimentConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyParetoApp {
    pub state: AppState,
}

impl RustyParetoApp {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RustyParetoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: hypervolume of the visible policies ----
        egui::TopBottomPanel::bottom("hypervolume_panel")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                plot::hypervolume_table(ui, &self.state);
            });

        // ---- Left side panel: slice and policies ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::front_plot(ui, &self.state);
        });
    }
}
