use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::category::EnergyTypeFilter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Please Filter:");
    ui.separator();

    let dataset = match &state.datasets {
        Some(ds) => ds,
        None => {
            ui.label("No data loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let continents = dataset.continents().to_vec();
    let years: Vec<i32> = dataset.years().iter().copied().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Continent checkboxes ----
            ui.strong("Continents");
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.set_all_continents(true);
                }
                if ui.small_button("None").clicked() {
                    state.set_all_continents(false);
                }
            });
            for continent in &continents {
                let mut checked = state.selection.continents.contains(continent);
                let text = RichText::new(continent).color(state.colors.color_for(continent));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_continent(continent);
                }
            }
            ui.separator();

            // ---- Year multiselect (collapsible) ----
            let header_text = format!(
                "Select Year(s)  ({}/{})",
                state.selection.years.len(),
                years.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("years")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.set_all_years(true);
                        }
                        if ui.small_button("None").clicked() {
                            state.set_all_years(false);
                        }
                    });
                    for &year in &years {
                        let mut checked = state.selection.years.contains(&year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            state.toggle_year(year);
                        }
                    }
                });
            ui.separator();

            // ---- Energy type radio ----
            ui.strong("Select Energy Type");
            let mut category = state.selection.category;
            for option in EnergyTypeFilter::ALL {
                ui.radio_value(&mut category, option, option.label());
            }
            state.set_category(category);
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.datasets {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.total_rows(),
                state.views.visible_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Open energy data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = dir {
        log::info!("Opening data folder {}", dir.display());
        state.open_data_dir(&dir);
    }
}
