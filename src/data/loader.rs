use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, HeartDataset, SourceRow};

/// Header order of the raw, headerless UCI `processed.*.data` files.
pub const UCI_HEADERS: [&str; 14] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal", "num",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a heart-disease dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with UCI column names, `num` or `target` as label
/// * `.data`    – headerless UCI file (`processed.cleveland.data`)
/// * `.json`    – `[{ "age": 63, "sex": 1, ... }, ...]`
/// * `.parquet` – one column per field, integer or float typed
pub fn load_file(path: &Path) -> Result<HeartDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        "data" => load_uci(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Row assembly shared by every format
// ---------------------------------------------------------------------------

/// Collects cells column by column and turns them into [`SourceRow`]s.
struct RowCollector {
    /// Source header → used column (if any), in file order.
    headers: Vec<(String, Option<Column>)>,
    rows: Vec<SourceRow>,
}

type Cells = [Option<f64>; Column::COUNT];

impl RowCollector {
    fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|h| {
                let h = h.into();
                let col = Column::from_header(&h);
                (h, col)
            })
            .collect();
        RowCollector {
            headers,
            rows: Vec::new(),
        }
    }

    fn add_header(&mut self, header: &str) {
        if !self.headers.iter().any(|(h, _)| h == header) {
            self.headers
                .push((header.to_string(), Column::from_header(header)));
        }
    }

    fn push(&mut self, cells: &Cells, row: usize) -> Result<()> {
        let get = |c: Column| cells[c as usize];
        let num = code(get(Column::Diagnosis))
            .with_context(|| format!("Row {row}: missing or non-integer diagnosis"))?;
        self.rows.push(SourceRow {
            age: get(Column::Age),
            sex: code(get(Column::Sex)),
            cp: code(get(Column::ChestPain)),
            trestbps: get(Column::RestingBp),
            chol: get(Column::Cholesterol),
            thalach: get(Column::MaxHeartRate),
            oldpeak: get(Column::StDepression),
            num,
        });
        Ok(())
    }

    fn finish(self) -> Result<HeartDataset> {
        let columns: BTreeSet<Column> = self.headers.iter().filter_map(|(_, c)| *c).collect();
        if !columns.contains(&Column::Diagnosis) {
            bail!("Dataset has no diagnosis column ('num' or 'target')");
        }
        let source_columns = self.headers.into_iter().map(|(h, _)| h).collect();
        Ok(HeartDataset::from_rows(self.rows, columns, source_columns))
    }
}

/// Categorical codes arrive as floats in the raw files (`1.0`).
fn code(value: Option<f64>) -> Option<i64> {
    value
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        .map(|v| v as i64)
}

/// Parse a text cell. Empty cells, `?`, NaN and infinities are missing values.
fn parse_cell(s: &str, row: usize, header: &str) -> Result<Option<f64>> {
    let s = s.trim();
    if s.is_empty() || s == "?" {
        return Ok(None);
    }
    let value = s
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {header}: '{s}' is not a number"))?;
    Ok(Some(value).filter(|v| v.is_finite()))
}

// ---------------------------------------------------------------------------
// CSV loaders
// ---------------------------------------------------------------------------

/// CSV layout: header row with UCI column names. Columns the dashboard does
/// not use are kept in the header list and otherwise skipped.
fn load_csv(path: &Path) -> Result<HeartDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    read_csv_records(reader, RowCollector::new(headers))
}

/// Headerless UCI layout, fixed 14 columns.
fn load_uci(path: &Path) -> Result<HeartDataset> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context("opening UCI data file")?;

    read_csv_records(reader, RowCollector::new(UCI_HEADERS))
}

fn read_csv_records<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    mut collector: RowCollector,
) -> Result<HeartDataset> {
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut cells: Cells = Default::default();
        for (value, (header, col)) in record.iter().zip(&collector.headers) {
            if let Some(col) = col {
                cells[*col as usize] = parse_cell(value, row_no, header)?;
            }
        }
        collector.push(&cells, row_no)?;
    }

    collector.finish()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "age": 63, "sex": 1, "cp": 1, "trestbps": 145, "chol": 233,
///     "thalach": 150, "oldpeak": 2.3, "num": 0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<HeartDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut collector = RowCollector::new(Vec::<String>::new());
    for rec in records {
        if let Some(obj) = rec.as_object() {
            for key in obj.keys() {
                collector.add_header(key);
            }
        }
    }

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells: Cells = Default::default();
        for (key, val) in obj {
            let Some(col) = Column::from_header(key) else {
                continue;
            };
            cells[col as usize] = json_to_f64(val, i, key)?;
        }
        collector.push(&cells, i)?;
    }

    collector.finish()
}

fn json_to_f64(val: &JsonValue, row: usize, key: &str) -> Result<Option<f64>> {
    match val {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => Ok(n.as_f64()),
        JsonValue::String(s) => parse_cell(s, row, key),
        other => bail!("Row {row}, {key}: unexpected value {other}"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<HeartDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut collector = RowCollector::new(headers);
    let mut row_base = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let used: Vec<(Column, &str, &Arc<dyn Array>)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter_map(|(i, f)| {
                Column::from_header(f.name()).map(|c| (c, f.name().as_str(), batch.column(i)))
            })
            .collect();

        for row in 0..batch.num_rows() {
            let mut cells: Cells = Default::default();
            for (col, name, array) in &used {
                cells[*col as usize] = extract_f64(array, row, row_base + row, name)
                    .with_context(|| format!("Row {}: failed to read '{name}'", row_base + row))?;
            }
            collector.push(&cells, row_base + row)?;
        }
        row_base += batch.num_rows();
    }

    collector.finish()
}

/// Extract a numeric cell from an Arrow column at a given row. `global_row`
/// and `header` only label parse errors of text columns.
fn extract_f64(
    col: &Arc<dyn Array>,
    row: usize,
    global_row: usize,
    header: &str,
) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            arr.value(row) as f64
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            arr.value(row) as f64
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            arr.value(row) as f64
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            arr.value(row)
        }
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            return parse_cell(arr.value(row), global_row, header);
        }
        other => bail!("Unsupported column type {other:?}"),
    };
    Ok(Some(value).filter(|v: &f64| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Variable;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_headed_csv_with_target_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "heart.csv",
            "age,sex,cp,trestbps,chol,fbs,thalach,oldpeak,target\n\
             63,1,1,145,233,1,150,2.3,0\n\
             67,1,4,160,286,0,108,,2\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.source_columns().len(), 9);
        assert!(ds.has_column(Column::StDepression));
        assert!(!ds.records()[0].has_disease());
        assert!(ds.records()[1].has_disease());
        assert_eq!(ds.records()[1].value(Variable::Oldpeak), None);
        assert_eq!(ds.records()[1].cp_label(), Some("Assintomático"));
    }

    #[test]
    fn loads_headerless_uci_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "processed.cleveland.data",
            "63.0,1.0,1.0,145.0,233.0,1.0,2.0,150.0,0.0,2.3,3.0,0.0,6.0,0\n\
             67.0,1.0,4.0,160.0,286.0,0.0,2.0,108.0,1.0,1.5,2.0,3.0,?,2\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.source_columns().len(), 14);
        assert_eq!(ds.records()[0].source().sex, Some(1));
        assert_eq!(ds.records()[0].value(Variable::Thalach), Some(150.0));
        assert_eq!(ds.records()[1].source().num, 2);
    }

    #[test]
    fn missing_optional_column_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "no_cp.csv", "age,sex,num\n40,0,0\n");
        let ds = load_file(&path).unwrap();
        assert!(!ds.has_column(Column::ChestPain));
        assert!(ds.has_column(Column::Age));
        assert_eq!(ds.records()[0].cp_label(), None);
    }

    #[test]
    fn missing_diagnosis_fails() {
        let dir = tempfile::tempdir().unwrap();
        let no_col = write_file(&dir, "a.csv", "age,sex\n40,0\n");
        assert!(load_file(&no_col).is_err());

        let bad_cell = write_file(&dir, "b.csv", "age,num\n40,?\n");
        let err = load_file(&bad_cell).unwrap_err();
        assert!(format!("{err:#}").contains("diagnosis"));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "heart.json",
            r#"[{"age": 63, "sex": 1, "cp": 1, "thalach": 150, "oldpeak": null, "num": 0},
                {"age": "41", "sex": 0, "cp": 2, "thalach": 172, "oldpeak": 1.4, "num": 1}]"#,
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].value(Variable::Age), Some(41.0));
        assert_eq!(ds.records()[0].value(Variable::Oldpeak), None);
        assert!(!ds.has_column(Column::Cholesterol));
    }

    #[test]
    fn loads_parquet_columns() {
        use arrow::array::{ArrayRef, Float64Array, Int32Array, Int64Array};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Float64, false),
            Field::new("sex", DataType::Int32, false),
            Field::new("oldpeak", DataType::Float64, true),
            Field::new("target", DataType::Int64, false),
        ]));
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(Float64Array::from(vec![63.0, 41.0])),
            Arc::new(Int32Array::from(vec![1, 0])),
            Arc::new(Float64Array::from(vec![Some(2.3), None])),
            Arc::new(Int64Array::from(vec![0, 3])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heart.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].sex_label(), Some("Masculino"));
        assert_eq!(ds.records()[1].value(Variable::Oldpeak), None);
        assert!(ds.records()[1].has_disease());
        assert!(!ds.has_column(Column::MaxHeartRate));
    }

    #[test]
    fn non_finite_cells_are_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "heart.csv",
            "age,chol,thalach,oldpeak,num\n\
             inf,-Infinity,NaN,1.5,0\n",
        );
        let ds = load_file(&path).unwrap();
        let rec = &ds.records()[0];
        assert_eq!(rec.source().age, None);
        assert_eq!(rec.source().chol, None);
        assert_eq!(rec.source().thalach, None);
        assert_eq!(rec.value(Variable::Oldpeak), Some(1.5));
    }

    #[test]
    fn parquet_text_errors_name_the_column_and_row() {
        use arrow::array::{ArrayRef, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("chol", DataType::Utf8, false),
            Field::new("target", DataType::Int64, false),
        ]));
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["233", "?", "high"])),
            Arc::new(Int64Array::from(vec![0, 1, 0])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let msg = format!("{:#}", load_file(&path).unwrap_err());
        assert!(msg.contains("Row 2, chol: 'high'"), "{msg}");
        assert!(!msg.contains("string column"), "{msg}");
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(load_file(Path::new("heart.xlsx")).is_err());
    }
}
