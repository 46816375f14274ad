use eframe::egui::{self, RichText, Ui};

use crate::data::filter::Selector;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔎 Filter Data");
    ui.separator();

    if let Some(year) = selector_combo(ui, "Select Year", &state.year_options, &state.selection.year) {
        state.set_year(year);
    }
    ui.add_space(6.0);
    if let Some(branch) =
        selector_combo(ui, "Select Branch", &state.branch_options, &state.selection.branch)
    {
        state.set_branch(branch);
    }

    ui.add_space(12.0);
    egui::CollapsingHeader::new(RichText::new("📥 Download Report").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| match &state.qr_image {
            Some(bytes) => {
                ui.add(
                    egui::Image::from_bytes("bytes://QR_link.png", bytes.clone())
                        .max_width(ui.available_width()),
                );
                ui.vertical_centered(|ui: &mut Ui| ui.small("Scan to open the report"));
            }
            None => {
                ui.label("QR image not available.");
            }
        });
}

/// A labelled combo box. Returns the newly picked option, if any.
fn selector_combo(ui: &mut Ui, label: &str, options: &[Selector], current: &Selector) -> Option<Selector> {
    let mut picked = None;
    ui.strong(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for opt in options {
                if ui.selectable_label(opt == current, opt.to_string()).clicked() {
                    picked = Some(opt.clone());
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Placement Overview");
        ui.separator();
        ui.label(format!(
            "{} records loaded, {} match the filters",
            state.store.len(),
            state.view.matching_records
        ));
        ui.separator();
        ui.label(format!("Year: {}  Branch: {}", state.selection.year, state.selection.branch));
    });
}
