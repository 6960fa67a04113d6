use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::diagnosis_color;
use crate::data::filter::DiagnosisFilter;
use crate::data::model::DIAGNOSIS_POSITIVE;
use crate::state::AppState;
use crate::views::error::ViewError;
use crate::views::table::{RecordDetail, TableColumn};

use super::view_error;

/// Table filters, the record table, and the detail card of the selected row.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.group(|ui: &mut Ui| {
        ui.heading("📋 Tabela de Dados Interativa");
        ui.label(RichText::new("Clique em uma linha para ver detalhes do paciente").weak());
        ui.add_space(4.0);
        table_controls(ui, state);
        ui.separator();
        record_table(ui, state);
    });

    ui.add_space(8.0);
    ui.group(|ui: &mut Ui| {
        ui.heading("👤 Detalhes do Paciente Selecionado");
        if let Some(views) = &state.views {
            match &views.detail {
                Ok(detail) => record_detail(ui, detail),
                Err(ViewError::NoData(msg)) => {
                    ui.label(RichText::new(msg).color(egui::Color32::from_rgb(0x17, 0xa2, 0xb8)));
                }
                Err(err) => view_error(ui, err),
            }
        }
    });
}

fn table_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Filtrar por diagnóstico:");
        let current = state.table_params.diagnosis;
        egui::ComboBox::from_id_salt("diagnosis_filter")
            .selected_text(diagnosis_filter_label(current))
            .show_ui(ui, |ui: &mut Ui| {
                for filter in [
                    DiagnosisFilter::All,
                    DiagnosisFilter::Healthy,
                    DiagnosisFilter::Diseased,
                ] {
                    if ui
                        .selectable_label(current == filter, diagnosis_filter_label(filter))
                        .clicked()
                    {
                        state.set_diagnosis(filter);
                    }
                }
            });

        ui.separator();
        ui.strong("Número de registros:");
        let limit = state.table_params.row_limit;
        let options = state.row_limit_options.clone();
        egui::ComboBox::from_id_salt("row_limit")
            .selected_text(format!("{limit} registros"))
            .show_ui(ui, |ui: &mut Ui| {
                for option in options {
                    if ui
                        .selectable_label(limit == option, format!("{option} registros"))
                        .clicked()
                    {
                        state.set_row_limit(option);
                    }
                }
            });

        ui.separator();
        ui.strong("Buscar:");
        let mut query = state.table_query.clone();
        if ui.text_edit_singleline(&mut query).changed() {
            state.set_table_query(query);
        }
    });
}

fn diagnosis_filter_label(filter: DiagnosisFilter) -> &'static str {
    match filter {
        DiagnosisFilter::All => "Todos os pacientes",
        DiagnosisFilter::Healthy => "Sem doença cardíaca",
        DiagnosisFilter::Diseased => "Com doença cardíaca",
    }
}

fn record_table(ui: &mut Ui, state: &mut AppState) {
    let Some(views) = &state.views else {
        return;
    };
    if let Err(err) = &views.table {
        view_error(ui, err);
        return;
    }

    let rows = &views.visible_rows;
    let sort = state.sort;
    let selected = state.selected_id;
    let mut sort_clicked = None;
    let mut row_clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(40.0))
        .columns(Column::auto().at_least(80.0), TableColumn::ALL.len() - 1)
        .max_scroll_height(360.0)
        .header(24.0, |mut header| {
            for col in TableColumn::ALL {
                header.col(|ui: &mut Ui| {
                    let arrow = match sort {
                        Some(o) if o.column == col && o.descending => " ⏷",
                        Some(o) if o.column == col => " ⏶",
                        _ => "",
                    };
                    if ui
                        .button(RichText::new(format!("{}{arrow}", col.title())).strong())
                        .clicked()
                    {
                        sort_clicked = Some(col);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(22.0, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.set_selected(selected == Some(r.id));
                for col in TableColumn::ALL {
                    row.col(|ui: &mut Ui| {
                        let text = r.cell(col).display();
                        if col == TableColumn::Diagnosis {
                            let diseased = r.diagnosis_label == DIAGNOSIS_POSITIVE;
                            ui.label(RichText::new(text).color(diagnosis_color(diseased)));
                        } else {
                            ui.label(text);
                        }
                    });
                }
                if row.response().clicked() {
                    row_clicked = Some(r.id);
                }
            });
        });

    if let Some(col) = sort_clicked {
        state.toggle_sort(col);
    }
    if let Some(id) = row_clicked {
        let next = if selected == Some(id) { None } else { Some(id) };
        state.select(next);
    }
}

fn record_detail(ui: &mut Ui, d: &RecordDetail) {
    let or_na = |v: Option<f64>, unit: &str| match v {
        Some(v) => format!("{v} {unit}").trim_end().to_string(),
        None => "N/A".to_string(),
    };

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("📋 Informações Básicas");
        cols[0].label(format!("ID do Paciente: {}", d.id));
        cols[0].label(format!("Idade: {}", or_na(d.age, "anos")));
        cols[0].label(format!("Sexo: {}", d.sex_label.unwrap_or("N/A")));
        cols[0].label(format!("Tipo de Dor no Peito: {}", d.cp_label.unwrap_or("N/A")));

        cols[1].strong("🔬 Dados Clínicos");
        cols[1].label(format!("Pressão Arterial em Repouso: {}", or_na(d.trestbps, "mmHg")));
        cols[1].label(format!("Colesterol Sérico: {}", or_na(d.chol, "mg/dl")));
        cols[1].label(format!("Frequência Cardíaca Máxima: {}", or_na(d.thalach, "bpm")));
        cols[1].label(format!("Depressão ST: {}", d.oldpeak_text()));
    });

    ui.add_space(6.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("🏥 Diagnóstico").strong());
        ui.label(
            RichText::new(d.verdict)
                .size(16.0)
                .color(diagnosis_color(d.has_disease)),
        );
    });
}
