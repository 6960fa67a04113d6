use serde::{Deserialize, Serialize};

use crate::data::filter::{sex_filtered, SexFilter};
use crate::data::model::{HeartDataset, Variable};

use super::error::{ViewError, ViewResult};

pub const DEFAULT_BINS: usize = 20;
/// Upper bound on the histogram bin count.
pub const MAX_BINS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionParams {
    /// Kept as text so an unknown name reaches the view and is reported.
    pub variable: String,
    #[serde(default)]
    pub sex: SexFilter,
}

/// One equal-width bin with per-diagnosis counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub healthy: usize,
    pub diseased: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn total(&self) -> usize {
        self.healthy + self.diseased
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub variable: Variable,
    pub title: String,
    pub axis_label: &'static str,
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(Bin::total).sum()
    }
}

/// Histogram of one numeric variable over the sex-filtered rows, split by
/// diagnosis. Bin edges come from the filtered values only.
pub fn distribution(
    dataset: &HeartDataset,
    params: &DistributionParams,
    n_bins: usize,
) -> ViewResult<Histogram> {
    let variable: Variable = params.variable.parse().map_err(ViewError::InvalidInput)?;
    if !dataset.has_column(variable.column()) {
        return Err(ViewError::InvalidInput(format!(
            "Variável {variable} não encontrada no dataset"
        )));
    }

    let rows = sex_filtered(dataset, params.sex);
    if rows.is_empty() {
        return Err(ViewError::no_data());
    }

    let values: Vec<(f64, bool)> = rows
        .iter()
        .filter_map(|r| r.value(variable).map(|v| (v, r.has_disease())))
        .collect();
    if values.is_empty() {
        return Err(ViewError::NoData(
            "Nenhum dado válido disponível após limpeza".to_string(),
        ));
    }

    Ok(Histogram {
        variable,
        title: format!("Distribuição de {}", variable.axis_label()),
        axis_label: variable.axis_label(),
        bins: bin_values(&values, n_bins.clamp(1, MAX_BINS)),
    })
}

fn bin_values(values: &[(f64, bool)], n_bins: usize) -> Vec<Bin> {
    let min = values.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
    let max = values.iter().map(|(v, _)| *v).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < f64::EPSILON {
        let diseased = values.iter().filter(|(_, d)| *d).count();
        return vec![Bin {
            start: min - 0.5,
            end: max + 0.5,
            healthy: values.len() - diseased,
            diseased,
        }];
    }

    let width = range / n_bins as f64;
    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: min + i as f64 * width,
            end: if i + 1 == n_bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            healthy: 0,
            diseased: 0,
        })
        .collect();

    for &(v, diseased) in values {
        // The maximum lands on the closing edge; fold it into the last bin.
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        if diseased {
            bins[idx].diseased += 1;
        } else {
            bins[idx].healthy += 1;
        }
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{dataset, five_rows, row};
    use crate::data::model::{Column, SourceRow};
    use std::collections::BTreeSet;

    fn params(variable: &str, sex: SexFilter) -> DistributionParams {
        DistributionParams {
            variable: variable.to_string(),
            sex,
        }
    }

    #[test]
    fn counts_sum_to_rows_with_values() {
        let mut rows: Vec<SourceRow> = (0..30)
            .map(|i| row(30.0 + i as f64, i % 2, 1, 150.0, i % 3))
            .collect();
        rows[4].age = None;
        rows[7].age = None;
        let ds = dataset(rows);

        for sex in [SexFilter::All, SexFilter::Female, SexFilter::Male] {
            let expected = sex_filtered(&ds, sex)
                .iter()
                .filter(|r| r.value(Variable::Age).is_some())
                .count();
            let hist = distribution(&ds, &params("age", sex), DEFAULT_BINS).unwrap();
            assert_eq!(hist.bins.len(), DEFAULT_BINS);
            assert_eq!(hist.total(), expected);
        }
    }

    #[test]
    fn edges_follow_filtered_range() {
        let ds = five_rows();
        // Men are 50 and 55 years old.
        let hist = distribution(&ds, &params("age", SexFilter::Male), 5).unwrap();
        assert_eq!(hist.bins.first().unwrap().start, 50.0);
        assert_eq!(hist.bins.last().unwrap().end, 55.0);
        assert_eq!(hist.bins.last().unwrap().total(), 1);
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn splits_by_diagnosis() {
        let ds = five_rows();
        let hist = distribution(&ds, &params("age", SexFilter::All), 3).unwrap();
        let healthy: usize = hist.bins.iter().map(|b| b.healthy).sum();
        let diseased: usize = hist.bins.iter().map(|b| b.diseased).sum();
        assert_eq!((healthy, diseased), (3, 2));
    }

    #[test]
    fn single_value_gets_one_bin() {
        let ds = dataset(vec![row(45.0, 0, 1, 150.0, 0), row(45.0, 0, 1, 150.0, 1)]);
        let hist = distribution(&ds, &params("age", SexFilter::All), DEFAULT_BINS).unwrap();
        assert_eq!(hist.bins.len(), 1);
        assert_eq!((hist.bins[0].healthy, hist.bins[0].diseased), (1, 1));
        assert_eq!(hist.bins[0].center(), 45.0);
    }

    #[test]
    fn infinite_values_stay_out_of_the_edges() {
        let ds = dataset(vec![
            row(f64::NEG_INFINITY, 0, 1, 150.0, 0),
            row(f64::INFINITY, 1, 1, 150.0, 1),
            row(40.0, 0, 1, 150.0, 0),
            row(60.0, 1, 1, 150.0, 1),
        ]);
        let hist = distribution(&ds, &params("age", SexFilter::All), 4).unwrap();
        assert_eq!(hist.total(), 2);
        assert!(hist.bins.iter().all(|b| b.start.is_finite() && b.end.is_finite()));
        assert_eq!(hist.bins[0].start, 40.0);
        assert_eq!(hist.bins[3].end, 60.0);
    }

    #[test]
    fn bin_count_is_capped() {
        let ds = five_rows();
        let hist = distribution(&ds, &params("age", SexFilter::All), usize::MAX).unwrap();
        assert_eq!(hist.bins.len(), MAX_BINS);
        assert_eq!(hist.total(), 5);
    }

    #[test]
    fn unknown_variable_is_invalid_input() {
        let ds = five_rows();
        let err = distribution(&ds, &params("pulse", SexFilter::All), DEFAULT_BINS).unwrap_err();
        assert!(matches!(err, ViewError::InvalidInput(_)));
    }

    #[test]
    fn absent_column_is_invalid_input() {
        let columns: BTreeSet<Column> = [Column::Age, Column::Sex, Column::Diagnosis].into();
        let ds = HeartDataset::from_rows(vec![row(40.0, 0, 1, 150.0, 0)], columns, Vec::new());
        let err = distribution(&ds, &params("chol", SexFilter::All), DEFAULT_BINS).unwrap_err();
        assert!(matches!(err, ViewError::InvalidInput(_)));
    }

    #[test]
    fn empty_filter_or_all_missing_is_no_data() {
        let ds = dataset(vec![row(40.0, 0, 1, 150.0, 0)]);
        let err = distribution(&ds, &params("age", SexFilter::Male), DEFAULT_BINS).unwrap_err();
        assert!(matches!(err, ViewError::NoData(_)));

        let mut r = row(40.0, 0, 1, 150.0, 0);
        r.oldpeak = None;
        let ds = dataset(vec![r]);
        let err = distribution(&ds, &params("oldpeak", SexFilter::All), DEFAULT_BINS).unwrap_err();
        assert!(matches!(err, ViewError::NoData(_)));
    }
}
