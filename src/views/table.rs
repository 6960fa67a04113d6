use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::data::filter::DiagnosisFilter;
use crate::data::model::{diagnosis_label, HeartDataset, PatientRecord, Variable};

use super::error::{ViewError, ViewResult};

pub const DEFAULT_ROW_LIMIT: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableParams {
    #[serde(default)]
    pub diagnosis: DiagnosisFilter,
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,
}

fn default_row_limit() -> usize {
    DEFAULT_ROW_LIMIT
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            diagnosis: DiagnosisFilter::All,
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

/// Projection of a record shown in the data table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// 1-based position in the unfiltered dataset.
    pub id: usize,
    pub age: Option<f64>,
    pub sex_label: Option<&'static str>,
    pub cp_label: Option<&'static str>,
    pub trestbps: Option<f64>,
    pub chol: Option<f64>,
    pub thalach: Option<f64>,
    pub diagnosis_label: &'static str,
}

impl TableRow {
    fn new(id: usize, rec: &PatientRecord) -> Self {
        TableRow {
            id,
            age: rec.value(Variable::Age),
            sex_label: rec.sex_label(),
            cp_label: rec.cp_label(),
            trestbps: rec.value(Variable::Trestbps),
            chol: rec.value(Variable::Chol),
            thalach: rec.value(Variable::Thalach),
            diagnosis_label: diagnosis_label(rec.has_disease()),
        }
    }

    pub fn cell(&self, column: TableColumn) -> CellValue {
        match column {
            TableColumn::Id => CellValue::Number(Some(self.id as f64)),
            TableColumn::Age => CellValue::Number(self.age),
            TableColumn::Sex => CellValue::Text(self.sex_label),
            TableColumn::ChestPain => CellValue::Text(self.cp_label),
            TableColumn::RestingBp => CellValue::Number(self.trestbps),
            TableColumn::Cholesterol => CellValue::Number(self.chol),
            TableColumn::MaxHeartRate => CellValue::Number(self.thalach),
            TableColumn::Diagnosis => CellValue::Text(Some(self.diagnosis_label)),
        }
    }
}

/// Full-detail projection of the selected record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDetail {
    pub id: usize,
    pub age: Option<f64>,
    pub sex_label: Option<&'static str>,
    pub cp_label: Option<&'static str>,
    pub trestbps: Option<f64>,
    pub chol: Option<f64>,
    pub thalach: Option<f64>,
    pub oldpeak: Option<f64>,
    pub has_disease: bool,
    pub verdict: &'static str,
}

impl RecordDetail {
    pub fn oldpeak_text(&self) -> String {
        self.oldpeak
            .map(|v| v.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

// ---------------------------------------------------------------------------
// Table view and lookup
// ---------------------------------------------------------------------------

/// Rows for the data table: IDs are assigned over the whole dataset first,
/// then the diagnosis filter and the row limit apply. The detail lookup
/// maps `id - 1` back into the dataset, so that order must hold.
pub fn table_view(dataset: &HeartDataset, params: &TableParams) -> ViewResult<Vec<TableRow>> {
    if params.row_limit == 0 {
        return Err(ViewError::InvalidInput(
            "row limit must be a positive integer".to_string(),
        ));
    }

    Ok(dataset
        .records()
        .iter()
        .enumerate()
        .map(|(i, rec)| (i + 1, rec))
        .filter(|(_, rec)| params.diagnosis.matches(rec))
        .take(params.row_limit)
        .map(|(id, rec)| TableRow::new(id, rec))
        .collect())
}

/// Detail of the row at `selected` in a previously produced table.
pub fn lookup_selected(
    dataset: &HeartDataset,
    table: &[TableRow],
    selected: Option<usize>,
) -> ViewResult<RecordDetail> {
    let Some(selected) = selected else {
        return Err(ViewError::NoData(
            "Selecione uma linha na tabela acima para ver os detalhes do paciente.".to_string(),
        ));
    };
    let row = table
        .get(selected)
        .ok_or_else(|| ViewError::NotFound(format!("Linha {selected} não existe na tabela")))?;
    record_detail(dataset, row.id)
}

/// Detail of the record with 1-based identifier `id`.
pub fn record_detail(dataset: &HeartDataset, id: usize) -> ViewResult<RecordDetail> {
    let rec = id
        .checked_sub(1)
        .and_then(|i| dataset.get(i))
        .ok_or_else(|| ViewError::NotFound("Erro ao carregar dados do paciente.".to_string()))?;

    Ok(RecordDetail {
        id,
        age: rec.value(Variable::Age),
        sex_label: rec.sex_label(),
        cp_label: rec.cp_label(),
        trestbps: rec.value(Variable::Trestbps),
        chol: rec.value(Variable::Chol),
        thalach: rec.value(Variable::Thalach),
        oldpeak: rec.value(Variable::Oldpeak),
        has_disease: rec.has_disease(),
        verdict: if rec.has_disease() {
            "POSITIVO para doença cardíaca"
        } else {
            "NEGATIVO para doença cardíaca"
        },
    })
}

// ---------------------------------------------------------------------------
// Table-local sort and filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Id,
    Age,
    Sex,
    ChestPain,
    RestingBp,
    Cholesterol,
    MaxHeartRate,
    Diagnosis,
}

impl TableColumn {
    pub const ALL: [TableColumn; 8] = [
        TableColumn::Id,
        TableColumn::Age,
        TableColumn::Sex,
        TableColumn::ChestPain,
        TableColumn::RestingBp,
        TableColumn::Cholesterol,
        TableColumn::MaxHeartRate,
        TableColumn::Diagnosis,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TableColumn::Id => "ID",
            TableColumn::Age => "Idade",
            TableColumn::Sex => "Sexo",
            TableColumn::ChestPain => "Tipo de Dor",
            TableColumn::RestingBp => "Pressão Arterial",
            TableColumn::Cholesterol => "Colesterol",
            TableColumn::MaxHeartRate => "Freq. Card. Máx.",
            TableColumn::Diagnosis => "Diagnóstico",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Number(Option<f64>),
    Text(Option<&'static str>),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(Some(v)) => v.to_string(),
            CellValue::Text(Some(s)) => s.to_string(),
            CellValue::Number(None) | CellValue::Text(None) => String::new(),
        }
    }

    /// Absent values sort last regardless of direction, so they are
    /// compared separately in [`sort_rows`].
    fn is_absent(&self) -> bool {
        matches!(self, CellValue::Number(None) | CellValue::Text(None))
    }

    fn cmp_present(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Number(Some(a)), CellValue::Number(Some(b))) => a.total_cmp(b),
            (CellValue::Text(Some(a)), CellValue::Text(Some(b))) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: TableColumn,
    pub descending: bool,
}

/// Stable sort of displayed rows; absent values always go last.
pub fn sort_rows(rows: &mut [TableRow], order: SortOrder) {
    rows.sort_by(|a, b| {
        let (x, y) = (a.cell(order.column), b.cell(order.column));
        match (x.is_absent(), y.is_absent()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if order.descending => y.cmp_present(&x),
            (false, false) => x.cmp_present(&y),
        }
    });
}

/// Keep rows where any displayed cell contains `query` (case-insensitive).
pub fn filter_rows(rows: &[TableRow], query: &str) -> Vec<TableRow> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| {
            TableColumn::ALL
                .iter()
                .any(|c| row.cell(*c).display().to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{dataset, five_rows, row};

    fn params(diagnosis: DiagnosisFilter, row_limit: usize) -> TableParams {
        TableParams {
            diagnosis,
            row_limit,
        }
    }

    #[test]
    fn diseased_rows_keep_dataset_ids() {
        let ds = five_rows();
        let rows = table_view(&ds, &params(DiagnosisFilter::Diseased, 2)).unwrap();
        let ids: Vec<usize> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 5]);
        assert!(rows.iter().all(|r| r.diagnosis_label == "Com Doença"));
    }

    #[test]
    fn length_is_min_of_limit_and_matches() {
        let ds = five_rows();
        for (filter, matching) in [
            (DiagnosisFilter::All, 5),
            (DiagnosisFilter::Healthy, 3),
            (DiagnosisFilter::Diseased, 2),
        ] {
            for limit in 1..=7 {
                let rows = table_view(&ds, &params(filter, limit)).unwrap();
                assert_eq!(rows.len(), limit.min(matching));
            }
        }
    }

    #[test]
    fn zero_limit_is_invalid() {
        let ds = five_rows();
        assert!(matches!(
            table_view(&ds, &params(DiagnosisFilter::All, 0)),
            Err(ViewError::InvalidInput(_))
        ));
    }

    #[test]
    fn every_table_id_resolves_to_its_position() {
        let ds = five_rows();
        for filter in [DiagnosisFilter::All, DiagnosisFilter::Healthy, DiagnosisFilter::Diseased] {
            let rows = table_view(&ds, &params(filter, 10)).unwrap();
            for (pos, row) in rows.iter().enumerate() {
                let detail = lookup_selected(&ds, &rows, Some(pos)).unwrap();
                let rec = &ds.records()[row.id - 1];
                assert_eq!(detail.id, row.id);
                assert_eq!(detail.age, rec.value(Variable::Age));
                assert_eq!(detail.has_disease, rec.has_disease());
            }
        }
    }

    #[test]
    fn lookup_misses_are_explicit() {
        let ds = five_rows();
        let rows = table_view(&ds, &params(DiagnosisFilter::All, 2)).unwrap();
        assert!(matches!(lookup_selected(&ds, &rows, None), Err(ViewError::NoData(_))));
        assert!(matches!(lookup_selected(&ds, &rows, Some(2)), Err(ViewError::NotFound(_))));
        assert!(matches!(record_detail(&ds, 0), Err(ViewError::NotFound(_))));
        assert!(matches!(record_detail(&ds, 6), Err(ViewError::NotFound(_))));
    }

    #[test]
    fn detail_marks_missing_st_depression() {
        let mut r = row(60.0, 1, 4, 120.0, 3);
        r.oldpeak = None;
        let ds = dataset(vec![r]);
        let detail = record_detail(&ds, 1).unwrap();
        assert_eq!(detail.oldpeak_text(), "N/A");
        assert_eq!(detail.verdict, "POSITIVO para doença cardíaca");
        assert_eq!(detail.sex_label, Some("Masculino"));
    }

    #[test]
    fn sort_puts_absent_last_both_ways() {
        let mut rows_src = vec![
            row(50.0, 0, 1, 150.0, 0),
            row(40.0, 0, 1, 150.0, 0),
            row(60.0, 0, 1, 150.0, 0),
        ];
        rows_src[0].age = None;
        let ds = dataset(rows_src);
        let mut rows = table_view(&ds, &TableParams::default()).unwrap();

        sort_rows(
            &mut rows,
            SortOrder {
                column: TableColumn::Age,
                descending: false,
            },
        );
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3, 1]);

        sort_rows(
            &mut rows,
            SortOrder {
                column: TableColumn::Age,
                descending: true,
            },
        );
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn text_filter_matches_any_cell() {
        let ds = five_rows();
        let rows = table_view(&ds, &TableParams::default()).unwrap();
        let hits = filter_rows(&rows, "assintom");
        assert_eq!(hits.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 5]);
        assert_eq!(filter_rows(&rows, "  ").len(), 5);
        assert_eq!(filter_rows(&rows, "MASCULINO").len(), 2);
    }
}
