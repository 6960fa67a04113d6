use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::model::{HeartDataset, PatientRecord};

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// Sex filter as offered by the radio buttons: `all`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SexFilter {
    #[default]
    All,
    Female,
    Male,
}

/// Diagnosis filter as offered by the table dropdown: `all`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosisFilter {
    #[default]
    All,
    Healthy,
    Diseased,
}

/// Parse the three-way `all` / `0` / `1` control value.
fn parse_tristate(s: &str) -> Result<Option<bool>, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    match s {
        "0" => Ok(Some(false)),
        "1" => Ok(Some(true)),
        other => Err(format!("invalid filter value '{other}', expected all, 0 or 1")),
    }
}

impl SexFilter {
    pub fn matches(self, record: &PatientRecord) -> bool {
        match self {
            SexFilter::All => true,
            SexFilter::Female => record.source().sex == Some(0),
            SexFilter::Male => record.source().sex == Some(1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SexFilter::All => "all",
            SexFilter::Female => "0",
            SexFilter::Male => "1",
        }
    }
}

impl DiagnosisFilter {
    pub fn matches(self, record: &PatientRecord) -> bool {
        match self {
            DiagnosisFilter::All => true,
            DiagnosisFilter::Healthy => !record.has_disease(),
            DiagnosisFilter::Diseased => record.has_disease(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosisFilter::All => "all",
            DiagnosisFilter::Healthy => "0",
            DiagnosisFilter::Diseased => "1",
        }
    }
}

impl FromStr for SexFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match parse_tristate(s)? {
            None => SexFilter::All,
            Some(false) => SexFilter::Female,
            Some(true) => SexFilter::Male,
        })
    }
}

impl FromStr for DiagnosisFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match parse_tristate(s)? {
            None => DiagnosisFilter::All,
            Some(false) => DiagnosisFilter::Healthy,
            Some(true) => DiagnosisFilter::Diseased,
        })
    }
}

impl fmt::Display for SexFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DiagnosisFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- serde: filters travel as their control values ("all", "0", "1") --

/// Accepts either a string (`"all"`, `"0"`) or a bare integer (`0`, `1`).
#[derive(Deserialize)]
#[serde(untagged)]
enum ControlValue {
    Text(String),
    Code(i64),
}

impl ControlValue {
    fn into_text(self) -> String {
        match self {
            ControlValue::Text(s) => s,
            ControlValue::Code(c) => c.to_string(),
        }
    }
}

macro_rules! control_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                ControlValue::deserialize(deserializer)?
                    .into_text()
                    .parse()
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

control_serde!(SexFilter);
control_serde!(DiagnosisFilter);

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Positions of records passing the sex filter, in dataset order.
pub fn sex_indices(dataset: &HeartDataset, filter: SexFilter) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| filter.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Records passing the sex filter, in dataset order.
pub fn sex_filtered(dataset: &HeartDataset, filter: SexFilter) -> Vec<&PatientRecord> {
    dataset
        .records()
        .iter()
        .filter(|rec| filter.matches(rec))
        .collect()
}
