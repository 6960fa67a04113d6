//! Grouped counts and scatter points over the sex-filtered rows.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::data::filter::{sex_filtered, SexFilter};
use crate::data::model::{Column, HeartDataset, Variable};

use super::error::{ViewError, ViewResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChestPainCount {
    pub label: String,
    pub has_disease: bool,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub age: f64,
    pub thalach: f64,
    pub has_disease: bool,
}

// ---------------------------------------------------------------------------
// Sex distribution
// ---------------------------------------------------------------------------

/// Row count per sex label. Rows with an unmapped sex code are not counted.
pub fn sex_distribution(dataset: &HeartDataset, sex: SexFilter) -> ViewResult<Vec<LabelCount>> {
    let rows = sex_filtered(dataset, sex);
    if rows.is_empty() {
        return Err(ViewError::no_data());
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unlabeled = 0;
    for rec in &rows {
        match rec.sex_label() {
            Some(label) => *counts.entry(label).or_default() += 1,
            None => unlabeled += 1,
        }
    }
    if unlabeled > 0 {
        debug!("sex distribution: {unlabeled} rows without a sex label");
    }

    Ok(counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Age vs. max heart rate
// ---------------------------------------------------------------------------

/// (age, max heart rate, diagnosis) for every filtered row having both values.
pub fn correlation(dataset: &HeartDataset, sex: SexFilter) -> ViewResult<Vec<ScatterPoint>> {
    let unavailable = || ViewError::NoData("Dados de correlação não disponíveis".to_string());

    if !dataset.has_column(Column::Age) || !dataset.has_column(Column::MaxHeartRate) {
        return Err(unavailable());
    }
    let rows = sex_filtered(dataset, sex);
    if rows.is_empty() {
        return Err(unavailable());
    }

    Ok(rows
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                age: r.value(Variable::Age)?,
                thalach: r.value(Variable::Thalach)?,
                has_disease: r.has_disease(),
            })
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Chest-pain type
// ---------------------------------------------------------------------------

/// Two-key tally of (chest-pain label, diagnosis), ordered by key.
pub fn chest_pain(dataset: &HeartDataset, sex: SexFilter) -> ViewResult<Vec<ChestPainCount>> {
    if !dataset.has_column(Column::ChestPain) {
        return Err(ViewError::InvalidInput(
            "Erro ao processar dados: coluna 'cp' ausente".to_string(),
        ));
    }
    let rows = sex_filtered(dataset, sex);
    if rows.is_empty() {
        return Err(ViewError::no_data());
    }

    let mut groups: BTreeMap<(&str, bool), usize> = BTreeMap::new();
    let mut unlabeled = 0;
    for rec in &rows {
        match rec.cp_label() {
            Some(label) => *groups.entry((label, rec.has_disease())).or_default() += 1,
            None => unlabeled += 1,
        }
    }
    if unlabeled > 0 {
        debug!("chest pain breakdown: {unlabeled} rows without a chest-pain label");
    }

    Ok(groups
        .into_iter()
        .map(|((label, has_disease), count)| ChestPainCount {
            label: label.to_string(),
            has_disease,
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{dataset, five_rows, row};
    use std::collections::BTreeSet;

    #[test]
    fn male_filter_counts_only_men() {
        let ds = five_rows();
        let counts = sex_distribution(&ds, SexFilter::Male).unwrap();
        assert_eq!(
            counts,
            vec![LabelCount {
                label: "Masculino".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn all_filter_counts_both_sexes() {
        let ds = five_rows();
        let counts = sex_distribution(&ds, SexFilter::All).unwrap();
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("Feminino", 3), ("Masculino", 2)]);
    }

    #[test]
    fn empty_filter_is_no_data() {
        let ds = dataset(vec![row(40.0, 0, 1, 150.0, 0)]);
        for result in [
            sex_distribution(&ds, SexFilter::Male).map(|_| ()),
            correlation(&ds, SexFilter::Male).map(|_| ()),
            chest_pain(&ds, SexFilter::Male).map(|_| ()),
        ] {
            assert!(matches!(result, Err(ViewError::NoData(_))));
        }
    }

    #[test]
    fn scatter_skips_rows_missing_a_value() {
        let mut rows = vec![row(40.0, 0, 1, 170.0, 0), row(60.0, 1, 4, 120.0, 1)];
        rows[0].thalach = None;
        let ds = dataset(rows);
        let points = correlation(&ds, SexFilter::All).unwrap();
        assert_eq!(
            points,
            vec![ScatterPoint {
                age: 60.0,
                thalach: 120.0,
                has_disease: true
            }]
        );
    }

    #[test]
    fn scatter_without_heart_rate_column_is_no_data() {
        let columns: BTreeSet<Column> = [Column::Age, Column::Sex, Column::Diagnosis].into();
        let ds = HeartDataset::from_rows(vec![row(40.0, 0, 1, 150.0, 0)], columns, Vec::new());
        assert!(matches!(
            correlation(&ds, SexFilter::All),
            Err(ViewError::NoData(_))
        ));
    }

    #[test]
    fn chest_pain_tally_by_label_and_diagnosis() {
        let ds = five_rows();
        let groups = chest_pain(&ds, SexFilter::All).unwrap();
        let keys: Vec<(&str, bool, usize)> = groups
            .iter()
            .map(|g| (g.label.as_str(), g.has_disease, g.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Angina atípica", false, 1),
                ("Angina típica", false, 1),
                ("Assintomático", true, 2),
                ("Dor não-anginosa", false, 1),
            ]
        );
    }

    #[test]
    fn chest_pain_without_column_is_invalid_input() {
        let columns: BTreeSet<Column> = [Column::Age, Column::Sex, Column::Diagnosis].into();
        let ds = HeartDataset::from_rows(vec![row(40.0, 0, 1, 150.0, 0)], columns, Vec::new());
        assert!(matches!(
            chest_pain(&ds, SexFilter::All),
            Err(ViewError::InvalidInput(_))
        ));
    }
}
