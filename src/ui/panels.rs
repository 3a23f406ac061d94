use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rusty_pareto::data::filter::FrontMode;
use rusty_pareto::data::model::Policy;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – slice selectors and policy filter
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Slice");
    ui.separator();

    let (seeds, generations) = match &state.table {
        Some(table) => (table.seeds.clone(), table.generations.clone()),
        None => {
            ui.label("No checkpoint file loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Seed / generation selectors ----
            ui.strong("Seed");
            let current_seed = state.seed;
            egui::ComboBox::from_id_salt("seed")
                .selected_text(current_seed.map(|s| s.to_string()).unwrap_or_default())
                .show_ui(ui, |ui: &mut Ui| {
                    for seed in &seeds {
                        if ui
                            .selectable_label(current_seed == Some(*seed), seed.to_string())
                            .clicked()
                        {
                            state.set_seed(*seed);
                        }
                    }
                });

            ui.strong("Generation");
            let current_generation = state.generation;
            egui::ComboBox::from_id_salt("generation")
                .selected_text(current_generation.map(|g| g.to_string()).unwrap_or_default())
                .show_ui(ui, |ui: &mut Ui| {
                    for generation in &generations {
                        if ui
                            .selectable_label(
                                current_generation == Some(*generation),
                                generation.to_string(),
                            )
                            .clicked()
                        {
                            state.set_generation(*generation);
                        }
                    }
                });
            ui.separator();

            // ---- Policy filter ----
            let header_text = format!("Policies  ({}/{})", state.policies.len(), Policy::ALL.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("policies")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none();
                        }
                    });

                    for policy in Policy::ALL {
                        let color = Color32::from(state.color_map.color_for(&policy));
                        let mut checked = state.policies.contains(&policy);
                        ui.horizontal(|ui: &mut Ui| {
                            ui.label(RichText::new("■").color(color));
                            let text = RichText::new(policy.as_str()).color(color);
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_policy(policy);
                            }
                        });
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for mode in FrontMode::ALL {
            if ui
                .selectable_label(state.mode == mode, mode.to_string())
                .on_hover_text(mode.title())
                .clicked()
            {
                state.set_mode(mode);
            }
        }

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows loaded, {} visible",
                table.len(),
                state.visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Open checkpoint fronts")
        .add_filter("CSV", &["csv"]);
    if state.config.results_dir.is_dir() {
        dialog = dialog.set_directory(&state.config.results_dir);
    }

    if let Some(path) = dialog.pick_file() {
        state.open(&path);
    }
}
