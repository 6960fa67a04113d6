use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::diagnosis_color;
use crate::data::filter::{sex_indices, SexFilter};
use crate::data::model::Variable;
use crate::state::AppState;
use crate::views::summary::DatasetSummary;

// ---------------------------------------------------------------------------
// Left side panel – chart controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🎛 Controles");
    ui.separator();

    match &state.dataset {
        None => {
            ui.label("Nenhum dataset carregado.");
            return;
        }
        Some(ds) if ds.is_empty() => {
            ui.label("O dataset não contém registros.");
            return;
        }
        Some(_) => {}
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Variable selector ----
            ui.strong("Selecione uma variável para análise:");
            let current = state.variable;
            egui::ComboBox::from_id_salt("variable")
                .selected_text(current.display_name())
                .show_ui(ui, |ui: &mut Ui| {
                    for var in Variable::ALL {
                        if ui
                            .selectable_label(current == var, var.display_name())
                            .clicked()
                        {
                            state.set_variable(var);
                        }
                    }
                });
            ui.add_space(8.0);
            ui.separator();

            // ---- Sex filter ----
            ui.strong("Filtrar por sexo:");
            for (filter, label) in [
                (SexFilter::All, "Todos"),
                (SexFilter::Male, "Masculino"),
                (SexFilter::Female, "Feminino"),
            ] {
                if ui.radio(state.sex == filter, label).clicked() {
                    state.set_sex(filter);
                }
            }

            if let Some(ds) = &state.dataset {
                ui.add_space(4.0);
                ui.label(format!(
                    "{} de {} registros",
                    sex_indices(ds, state.sex).len(),
                    ds.len()
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// Summary cards
// ---------------------------------------------------------------------------

/// The four headline numbers above the charts.
pub fn summary_cards(ui: &mut Ui, summary: &DatasetSummary) {
    let cards = [
        (summary.total_records, "Total de Registros", Color32::from_rgb(0x17, 0xa2, 0xb8)),
        (summary.variables, "Variáveis", Color32::from_rgb(0xdc, 0x35, 0x45)),
        (summary.with_disease, "Com Doença Cardíaca", diagnosis_color(true)),
        (summary.without_disease, "Sem Doença Cardíaca", diagnosis_color(false)),
    ];
    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (value, caption, color)) in cols.iter_mut().zip(cards) {
            col.group(|ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(value.to_string()).size(24.0).color(color));
                    ui.label(RichText::new(caption).weak());
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} registros, {} colunas",
                ds.len(),
                ds.source_columns().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir dataset de doenças cardíacas")
        .add_filter("Supported files", &["csv", "data", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("UCI", &["data"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records with columns {:?}",
                    dataset.len(),
                    dataset.source_columns()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Erro: {e:#}"));
            }
        }
    }
}
