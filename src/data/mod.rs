/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .data / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SourceRow per patient
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ HeartDataset  │  Vec<PatientRecord> with derived labels, read-only
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  sex / diagnosis predicates → matching rows
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
