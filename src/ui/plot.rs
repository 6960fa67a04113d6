use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use crate::color::{diagnosis_color, ColorMap};
use crate::data::model::diagnosis_label;
use crate::views::breakdown::{ChestPainCount, LabelCount, ScatterPoint};
use crate::views::distribution::Histogram;
use crate::views::error::ViewResult;

use super::view_error;

const CHART_HEIGHT: f32 = 280.0;

/// Draw a chart from a view result, or the view's error message.
fn chart<T>(ui: &mut Ui, title: &str, result: &ViewResult<T>, draw: impl FnOnce(&mut Ui, &T)) {
    ui.group(|ui: &mut Ui| {
        ui.label(RichText::new(title).strong().size(16.0));
        match result {
            Ok(data) => draw(ui, data),
            Err(err) => view_error(ui, err),
        }
    });
}

/// Axis formatter that shows category names at integer positions.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Distribution histogram
// ---------------------------------------------------------------------------

pub fn distribution_chart(ui: &mut Ui, result: &ViewResult<Histogram>) {
    let title = match result {
        Ok(h) => h.title.clone(),
        Err(_) => "Distribuição".to_string(),
    };
    chart(ui, &title, result, |ui: &mut Ui, hist: &Histogram| {
        let series = |diseased: bool| -> Vec<Bar> {
            hist.bins
                .iter()
                .map(|b| {
                    let count = if diseased { b.diseased } else { b.healthy };
                    Bar::new(b.center(), count as f64).width(b.width().max(f64::EPSILON))
                })
                .collect()
        };
        let healthy = BarChart::new(series(false))
            .name(diagnosis_label(false))
            .color(diagnosis_color(false));
        let diseased = BarChart::new(series(true))
            .name(diagnosis_label(true))
            .color(diagnosis_color(true))
            .stack_on(&[&healthy]);

        Plot::new("distribution_plot")
            .legend(Legend::default())
            .height(CHART_HEIGHT)
            .x_axis_label(hist.axis_label)
            .y_axis_label("Frequência")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(healthy);
                plot_ui.bar_chart(diseased);
            });
    });
}

// ---------------------------------------------------------------------------
// Sex distribution
// ---------------------------------------------------------------------------

pub fn sex_chart(ui: &mut Ui, result: &ViewResult<Vec<LabelCount>>, colors: &ColorMap) {
    chart(ui, "Distribuição por Sexo", result, |ui: &mut Ui, counts: &Vec<LabelCount>| {
        let total: usize = counts.iter().map(|c| c.count).sum();
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let share = 100.0 * c.count as f64 / total.max(1) as f64;
                Bar::new(i as f64, c.count as f64)
                    .width(0.6)
                    .name(format!("{} ({share:.1}%)", c.label))
                    .fill(colors.color_for(&c.label))
            })
            .collect();
        let labels = counts.iter().map(|c| c.label.clone()).collect();

        Plot::new("sex_plot")
            .height(CHART_HEIGHT)
            .y_axis_label("Quantidade")
            .x_axis_formatter(category_axis(labels))
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    });
}

// ---------------------------------------------------------------------------
// Age vs. max heart rate
// ---------------------------------------------------------------------------

pub fn correlation_chart(ui: &mut Ui, result: &ViewResult<Vec<ScatterPoint>>) {
    chart(
        ui,
        "Idade vs Frequência Cardíaca Máxima",
        result,
        |ui: &mut Ui, points: &Vec<ScatterPoint>| {
            let series = |diseased: bool| -> PlotPoints {
                points
                    .iter()
                    .filter(|p| p.has_disease == diseased)
                    .map(|p| [p.age, p.thalach])
                    .collect()
            };

            Plot::new("correlation_plot")
                .legend(Legend::default())
                .height(CHART_HEIGHT)
                .x_axis_label("Idade (anos)")
                .y_axis_label("Freq. Cardíaca Máxima (bpm)")
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for diseased in [false, true] {
                        plot_ui.points(
                            Points::new(series(diseased))
                                .name(diagnosis_label(diseased))
                                .color(diagnosis_color(diseased))
                                .radius(3.0),
                        );
                    }
                });
        },
    );
}

// ---------------------------------------------------------------------------
// Chest-pain type
// ---------------------------------------------------------------------------

pub fn chest_pain_chart(ui: &mut Ui, result: &ViewResult<Vec<ChestPainCount>>) {
    chart(
        ui,
        "Tipos de Dor no Peito",
        result,
        |ui: &mut Ui, groups: &Vec<ChestPainCount>| {
            let mut labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
            labels.dedup();

            let series = |diseased: bool| -> BarChart {
                let bars = groups
                    .iter()
                    .filter(|g| g.has_disease == diseased)
                    .filter_map(|g| {
                        let x = labels.iter().position(|l| *l == g.label)? as f64;
                        let offset = if diseased { 0.2 } else { -0.2 };
                        Some(Bar::new(x + offset, g.count as f64).width(0.4).name(&g.label))
                    })
                    .collect();
                BarChart::new(bars)
                    .name(diagnosis_label(diseased))
                    .color(diagnosis_color(diseased))
            };
            let healthy = series(false);
            let diseased = series(true);

            Plot::new("chest_pain_plot")
                .legend(Legend::default())
                .height(CHART_HEIGHT)
                .y_axis_label("Quantidade")
                .x_axis_formatter(category_axis(labels.clone()))
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(healthy);
                    plot_ui.bar_chart(diseased);
                });
        },
    );
}
