use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column – every source column the dashboard reads
// ---------------------------------------------------------------------------

/// Source columns of the UCI heart-disease table that the dashboard uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Age,
    Sex,
    ChestPain,
    RestingBp,
    Cholesterol,
    MaxHeartRate,
    StDepression,
    Diagnosis,
}

impl Column {
    pub const COUNT: usize = 8;

    pub const ALL: [Column; Column::COUNT] = [
        Column::Age,
        Column::Sex,
        Column::ChestPain,
        Column::RestingBp,
        Column::Cholesterol,
        Column::MaxHeartRate,
        Column::StDepression,
        Column::Diagnosis,
    ];

    /// Column name as it appears in the UCI files.
    pub fn name(self) -> &'static str {
        match self {
            Column::Age => "age",
            Column::Sex => "sex",
            Column::ChestPain => "cp",
            Column::RestingBp => "trestbps",
            Column::Cholesterol => "chol",
            Column::MaxHeartRate => "thalach",
            Column::StDepression => "oldpeak",
            Column::Diagnosis => "num",
        }
    }

    /// Resolve a source header. The diagnosis column ships as `num` in the
    /// raw files and as `target` once joined with the label table.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        if header.eq_ignore_ascii_case("target") {
            return Some(Column::Diagnosis);
        }
        Column::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(header))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Variable – the numeric columns offered for the distribution chart
// ---------------------------------------------------------------------------

/// The fixed set of numeric variables a distribution can be drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variable {
    Age,
    Trestbps,
    Chol,
    Thalach,
    Oldpeak,
}

impl Variable {
    pub const ALL: [Variable; 5] = [
        Variable::Age,
        Variable::Trestbps,
        Variable::Chol,
        Variable::Thalach,
        Variable::Oldpeak,
    ];

    pub fn column(self) -> Column {
        match self {
            Variable::Age => Column::Age,
            Variable::Trestbps => Column::RestingBp,
            Variable::Chol => Column::Cholesterol,
            Variable::Thalach => Column::MaxHeartRate,
            Variable::Oldpeak => Column::StDepression,
        }
    }

    pub fn name(self) -> &'static str {
        self.column().name()
    }

    /// Label used in the variable selector.
    pub fn display_name(self) -> &'static str {
        match self {
            Variable::Age => "Idade",
            Variable::Trestbps => "Pressão Arterial em Repouso",
            Variable::Chol => "Colesterol",
            Variable::Thalach => "Frequência Cardíaca Máxima",
            Variable::Oldpeak => "Depressão ST",
        }
    }

    /// Axis title, with unit.
    pub fn axis_label(self) -> &'static str {
        match self {
            Variable::Age => "Idade (anos)",
            Variable::Trestbps => "Pressão Arterial em Repouso (mmHg)",
            Variable::Chol => "Colesterol (mg/dl)",
            Variable::Thalach => "Frequência Cardíaca Máxima (bpm)",
            Variable::Oldpeak => "Depressão ST",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .into_iter()
            .find(|v| v.name() == s.trim())
            .ok_or_else(|| format!("Variável {s} não encontrada no dataset"))
    }
}

// ---------------------------------------------------------------------------
// Label mappings
// ---------------------------------------------------------------------------

pub const DIAGNOSIS_NEGATIVE: &str = "Sem Doença";
pub const DIAGNOSIS_POSITIVE: &str = "Com Doença";

pub fn sex_label(code: i64) -> Option<&'static str> {
    match code {
        0 => Some("Feminino"),
        1 => Some("Masculino"),
        _ => None,
    }
}

pub fn chest_pain_label(code: i64) -> Option<&'static str> {
    match code {
        1 => Some("Angina típica"),
        2 => Some("Angina atípica"),
        3 => Some("Dor não-anginosa"),
        4 => Some("Assintomático"),
        _ => None,
    }
}

pub fn diagnosis_label(has_disease: bool) -> &'static str {
    if has_disease {
        DIAGNOSIS_POSITIVE
    } else {
        DIAGNOSIS_NEGATIVE
    }
}

// ---------------------------------------------------------------------------
// SourceRow – one row as read from disk
// ---------------------------------------------------------------------------

/// Raw values of one patient row, before anything is derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
    pub age: Option<f64>,
    pub sex: Option<i64>,
    pub cp: Option<i64>,
    pub trestbps: Option<f64>,
    pub chol: Option<f64>,
    pub thalach: Option<f64>,
    pub oldpeak: Option<f64>,
    /// Diagnosis severity: 0 = none, 1..=4 increasing severity.
    pub num: i64,
}

// ---------------------------------------------------------------------------
// PatientRecord – one row plus its derived columns
// ---------------------------------------------------------------------------

/// A patient row. Derived columns are computed in [`PatientRecord::new`] and
/// there is no setter for either side, so they cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    source: SourceRow,
    has_disease: bool,
    sex_label: Option<&'static str>,
    cp_label: Option<&'static str>,
}

impl PatientRecord {
    pub fn new(source: SourceRow) -> Self {
        PatientRecord {
            has_disease: source.num > 0,
            sex_label: source.sex.and_then(sex_label),
            cp_label: source.cp.and_then(chest_pain_label),
            source,
        }
    }

    pub fn source(&self) -> &SourceRow {
        &self.source
    }

    pub fn has_disease(&self) -> bool {
        self.has_disease
    }

    pub fn sex_label(&self) -> Option<&'static str> {
        self.sex_label
    }

    pub fn cp_label(&self) -> Option<&'static str> {
        self.cp_label
    }

    /// Value of a numeric variable, `None` when missing or not finite.
    pub fn value(&self, variable: Variable) -> Option<f64> {
        let v = match variable {
            Variable::Age => self.source.age,
            Variable::Trestbps => self.source.trestbps,
            Variable::Chol => self.source.chol,
            Variable::Thalach => self.source.thalach,
            Variable::Oldpeak => self.source.oldpeak,
        };
        v.filter(|x| x.is_finite())
    }
}

// ---------------------------------------------------------------------------
// HeartDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct HeartDataset {
    records: Vec<PatientRecord>,
    /// Used columns that were present in the source.
    columns: BTreeSet<Column>,
    /// Every header of the source file, in file order.
    source_columns: Vec<String>,
}

impl HeartDataset {
    /// Build the dataset, deriving presentation columns row by row.
    pub fn from_rows(
        rows: Vec<SourceRow>,
        columns: BTreeSet<Column>,
        source_columns: Vec<String>,
    ) -> Self {
        HeartDataset {
            records: rows.into_iter().map(PatientRecord::new).collect(),
            columns,
            source_columns,
        }
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&PatientRecord> {
        self.records.get(index)
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn row(age: f64, sex: i64, cp: i64, thalach: f64, num: i64) -> SourceRow {
        SourceRow {
            age: Some(age),
            sex: Some(sex),
            cp: Some(cp),
            trestbps: Some(130.0),
            chol: Some(240.0),
            thalach: Some(thalach),
            oldpeak: Some(1.0),
            num,
        }
    }

    pub fn dataset(rows: Vec<SourceRow>) -> HeartDataset {
        let columns = Column::ALL.into_iter().collect();
        let source_columns = Column::ALL.iter().map(|c| c.name().to_string()).collect();
        HeartDataset::from_rows(rows, columns, source_columns)
    }

    /// Five rows, sex `[0,1,0,1,0]`, disease at positions 2 and 4.
    pub fn five_rows() -> HeartDataset {
        dataset(vec![
            row(40.0, 0, 1, 170.0, 0),
            row(50.0, 1, 2, 160.0, 0),
            row(60.0, 0, 4, 120.0, 2),
            row(55.0, 1, 3, 150.0, 0),
            row(70.0, 0, 4, 110.0, 1),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn derived_columns_follow_source() {
        let ds = five_rows();
        let flags: Vec<bool> = ds.records().iter().map(|r| r.has_disease()).collect();
        assert_eq!(flags, vec![false, false, true, false, true]);
        assert_eq!(ds.records()[1].sex_label(), Some("Masculino"));
        assert_eq!(ds.records()[0].cp_label(), Some("Angina típica"));
    }

    #[test]
    fn unmapped_codes_have_no_label() {
        let rec = PatientRecord::new(SourceRow {
            sex: Some(7),
            cp: Some(9),
            ..SourceRow::default()
        });
        assert_eq!(rec.sex_label(), None);
        assert_eq!(rec.cp_label(), None);
        assert!(!rec.has_disease());
    }

    #[test]
    fn variable_parsing() {
        assert_eq!("thalach".parse::<Variable>(), Ok(Variable::Thalach));
        assert!("pulse".parse::<Variable>().is_err());
        assert_eq!(Column::from_header("target"), Some(Column::Diagnosis));
        assert_eq!(Column::from_header(" CP "), Some(Column::ChestPain));
        assert_eq!(Column::from_header("thal"), None);
    }

    #[test]
    fn nan_reads_as_missing() {
        let rec = PatientRecord::new(SourceRow {
            oldpeak: Some(f64::NAN),
            ..SourceRow::default()
        });
        assert_eq!(rec.value(Variable::Oldpeak), None);
    }

    #[test]
    fn emptiness_follows_records() {
        assert!(HeartDataset::default().is_empty());
        let ds = five_rows();
        assert!(!ds.is_empty());
        assert_eq!(ds.len(), 5);
    }

    #[test]
    fn infinite_reads_as_missing() {
        let rec = PatientRecord::new(SourceRow {
            age: Some(f64::INFINITY),
            chol: Some(f64::NEG_INFINITY),
            thalach: Some(150.0),
            ..SourceRow::default()
        });
        assert_eq!(rec.value(Variable::Age), None);
        assert_eq!(rec.value(Variable::Chol), None);
        assert_eq!(rec.value(Variable::Thalach), Some(150.0));
    }
}
