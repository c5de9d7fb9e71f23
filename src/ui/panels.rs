use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;
use crate::view::View;

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the view selector.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📊 Dashboard Navigation");
    ui.separator();
    ui.label("Choose a Visualization:");
    ui.add_space(4.0);

    let mut selected = state.view;
    for view in View::ALL {
        ui.radio_value(&mut selected, view, view.label());
    }
    state.select_view(selected);

    ui.add_space(8.0);
    ui.separator();

    let Some(ds) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    if ds.is_empty() {
        ui.label(RichText::new("The dataset has no rows.").color(Color32::YELLOW));
    }
    ui.collapsing("Columns", |ui: &mut Ui| {
        for col in ds.columns() {
            let kind = if col.is_numeric() { "numeric" } else { "text" };
            ui.label(format!("{}  ({kind})", col.name));
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let source = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} countries, {} columns",
                ds.len(),
                ds.columns().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Intro and footer
// ---------------------------------------------------------------------------

/// Dashboard title and the short description under it.
pub fn intro(ui: &mut Ui) {
    ui.heading(RichText::new("🌍 World Happiness Report 2023 Dashboard").size(26.0));
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        ui.label("Gain insights into ");
        ui.label(RichText::new("global happiness trends").strong());
        ui.label(" and explore how factors like ");
        ui.label(RichText::new("GDP").strong());
        ui.label(", ");
        ui.label(RichText::new("social support").strong());
        ui.label(", ");
        ui.label(RichText::new("health").strong());
        ui.label(", and ");
        ui.label(RichText::new("freedom").strong());
        ui.label(" contribute to well-being across nations.");
    });
    ui.separator();
}

pub fn footer(ui: &mut Ui) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Developed by:").strong());
        ui.label("Fahad Azeem  |  🌐");
        ui.label(RichText::new("World Happiness Report 2023 Visualization").italics());
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open happiness report")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
