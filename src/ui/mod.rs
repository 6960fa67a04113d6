//! egui rendering. Widgets read [`crate::state::AppState`] and report
//! control changes back through its setters; no view logic lives here.

pub mod panels;
pub mod plot;
pub mod table;

use eframe::egui::{Color32, RichText, Ui};

use crate::views::error::ViewError;

/// Render a view error in place of its chart or table.
pub fn view_error(ui: &mut Ui, err: &ViewError) {
    let color = match err {
        ViewError::NoData(_) => Color32::GRAY,
        ViewError::InvalidInput(_) => Color32::from_rgb(0xe6, 0x7e, 0x22),
        ViewError::NotFound(_) | ViewError::Internal(_) => Color32::RED,
    };
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(12.0);
        ui.label(RichText::new(err.message()).color(color));
        ui.add_space(12.0);
    });
}
