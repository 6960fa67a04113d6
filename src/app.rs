use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CardioscopeApp {
    pub state: AppState,
}

impl CardioscopeApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CardioscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: cards, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("🫀 Análise de Doenças Cardíacas").size(26.0));
        ui.label(
            RichText::new(
                "Dashboard interativo para análise do dataset de doenças cardíacas do UCI ML Repository",
            )
            .weak(),
        );
    });
    ui.add_space(8.0);

    let Some(views) = &state.views else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Abra um arquivo para ver o dashboard  (Arquivo → Abrir…)");
        });
        return;
    };

    ui.heading("📊 Informações do Dataset");
    panels::summary_cards(ui, &views.summary);
    ui.add_space(8.0);

    ui.heading("📈 Visualizações");
    ui.columns(2, |cols: &mut [Ui]| {
        plot::distribution_chart(&mut cols[0], &views.distribution);
        plot::sex_chart(&mut cols[1], &views.sex, &state.sex_colors);
    });
    ui.columns(2, |cols: &mut [Ui]| {
        plot::correlation_chart(&mut cols[0], &views.correlation);
        plot::chest_pain_chart(&mut cols[1], &views.chest_pain);
    });
    ui.add_space(8.0);

    table::data_table(ui, state);
}
