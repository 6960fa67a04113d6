use serde::Serialize;

use crate::data::model::HeartDataset;

/// Columns every loaded dataset gains at load time.
const DERIVED_COLUMNS: usize = 3;

/// Headline numbers shown above the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub variables: usize,
    pub with_disease: usize,
    pub without_disease: usize,
}

pub fn summary(dataset: &HeartDataset) -> DatasetSummary {
    let with_disease = dataset
        .records()
        .iter()
        .filter(|r| r.has_disease())
        .count();
    DatasetSummary {
        total_records: dataset.len(),
        variables: dataset.source_columns().len() + DERIVED_COLUMNS,
        with_disease,
        without_disease: dataset.len() - with_disease,
    }
}
