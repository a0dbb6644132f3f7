use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use social_pulse::data::filter::{dimension_values, Dimension};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

enum FilterAction {
    Toggle(Dimension, String),
    All(Dimension),
    None(Dimension),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard Controls");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Widgets only record what was clicked; state changes after the loop.
    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let all_values = dimension_values(&dataset, dim);
                let n_selected = state.selection.values(dim).len();
                let header_text = format!("{}  ({n_selected}/{})", dim.label(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                actions.push(FilterAction::All(dim));
                            }
                            if ui.small_button("None").clicked() {
                                actions.push(FilterAction::None(dim));
                            }
                        });

                        for val in &all_values {
                            let mut text = RichText::new(val);
                            if dim == Dimension::Platform {
                                if let Some(cm) = &state.color_map {
                                    text = text.color(cm.color_for(val));
                                }
                            }

                            let mut checked = state.selection.contains(dim, val);
                            if ui.checkbox(&mut checked, text).changed() {
                                actions.push(FilterAction::Toggle(dim, val.clone()));
                            }
                        }
                    });
            }
        });

    for action in actions {
        match action {
            FilterAction::Toggle(dim, val) => state.toggle_filter_value(dim, &val),
            FilterAction::All(dim) => state.select_all(dim),
            FilterAction::None(dim) => state.select_none(dim),
        }
    }
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
            if ui
                .add_enabled(state.upload.is_some(), egui::Button::new("Use default dataset"))
                .clicked()
            {
                state.clear_upload();
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.force_reload();
                ui.close_menu();
            }
            ui.separator();
            let has_data = state.dataset.is_some();
            if ui
                .add_enabled(has_data, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_csv_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Export report JSON…"))
                .clicked()
            {
                save_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let source = state
                .upload
                .as_ref()
                .map(|u| u.name.clone())
                .unwrap_or_else(|| state.config.fallback_path.display().to_string());
            ui.label(format!(
                "{source}: {} posts loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open social media data")
        .add_filter(
            "Supported files",
            &["csv", "tsv", "xlsx", "xlsm", "xls", "ods", "parquet", "pq"],
        )
        .add_filter("CSV / TSV", &["csv", "tsv"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}

fn save_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(&state.config.export_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_csv(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn save_report_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard report")
        .set_file_name("social_media_report.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_report(&path) {
            log::error!("Report export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
