/// Views: pure functions from (dataset, parameters) to renderable data.
///
/// ```text
///   ViewRequest ──► evaluate() ──► distribution / breakdown / table / summary
///                       │
///                       ▼
///                 ViewResponse  (payload, or error { kind, message })
/// ```
///
/// Every view reads the dataset through a shared reference and owns its
/// result; nothing is cached between calls.

pub mod breakdown;
pub mod distribution;
pub mod error;
pub mod summary;
pub mod table;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::filter::SexFilter;
use crate::data::model::HeartDataset;

use breakdown::{ChestPainCount, LabelCount, ScatterPoint};
use distribution::{DistributionParams, Histogram};
use error::{ErrorKind, ViewError, ViewResult};
use summary::DatasetSummary;
use table::{RecordDetail, TableParams, TableRow};

/// Knobs that are not per-request filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub bins: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            bins: distribution::DEFAULT_BINS,
        }
    }
}

/// One view evaluation, as sent by a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewRequest {
    Summary,
    Distribution(DistributionParams),
    SexDistribution {
        #[serde(default)]
        sex: SexFilter,
    },
    Correlation {
        #[serde(default)]
        sex: SexFilter,
    },
    ChestPain {
        #[serde(default)]
        sex: SexFilter,
    },
    Table(TableParams),
    Detail {
        #[serde(default)]
        table: TableParams,
        selected_row: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum ViewResponse {
    Summary(DatasetSummary),
    Distribution(Histogram),
    SexDistribution(Vec<LabelCount>),
    Correlation(Vec<ScatterPoint>),
    ChestPain(Vec<ChestPainCount>),
    Table(Vec<TableRow>),
    Detail(RecordDetail),
    Error { kind: ErrorKind, message: String },
}

impl From<ViewError> for ViewResponse {
    fn from(err: ViewError) -> Self {
        ViewResponse::Error {
            kind: err.kind(),
            message: err.message().to_string(),
        }
    }
}

/// Parse a JSON request. Malformed JSON, unknown views and out-of-range
/// control values are all invalid input.
pub fn parse_request(json: &str) -> ViewResult<ViewRequest> {
    serde_json::from_str(json).map_err(|e| ViewError::InvalidInput(e.to_string()))
}

/// Parse and evaluate a JSON request. Never fails: every problem comes back
/// as an error response.
pub fn respond(dataset: &HeartDataset, json: &str, settings: &ViewSettings) -> ViewResponse {
    match parse_request(json) {
        Ok(request) => evaluate(dataset, &request, settings),
        Err(err) => {
            debug!("rejected request {json}: {err}");
            err.into()
        }
    }
}

/// Evaluate one request. A panicking view is turned into an `internal`
/// error response instead of unwinding into the caller.
pub fn evaluate(
    dataset: &HeartDataset,
    request: &ViewRequest,
    settings: &ViewSettings,
) -> ViewResponse {
    match guarded(|| dispatch(dataset, request, settings)) {
        Ok(response) => response,
        Err(err) => {
            debug!("view {request:?} produced {:?}: {err}", err.kind());
            err.into()
        }
    }
}

/// Run `view`, converting a panic into [`ViewError::Internal`]. Used by the
/// desktop state, which keeps typed results instead of responses.
pub fn guarded<T>(view: impl FnOnce() -> ViewResult<T>) -> ViewResult<T> {
    panic::catch_unwind(AssertUnwindSafe(view))
        .unwrap_or_else(|payload| Err(ViewError::Internal(panic_message(payload.as_ref()))))
}

fn dispatch(
    dataset: &HeartDataset,
    request: &ViewRequest,
    settings: &ViewSettings,
) -> ViewResult<ViewResponse> {
    Ok(match request {
        ViewRequest::Summary => ViewResponse::Summary(summary::summary(dataset)),
        ViewRequest::Distribution(params) => ViewResponse::Distribution(
            distribution::distribution(dataset, params, settings.bins)?,
        ),
        ViewRequest::SexDistribution { sex } => {
            ViewResponse::SexDistribution(breakdown::sex_distribution(dataset, *sex)?)
        }
        ViewRequest::Correlation { sex } => {
            ViewResponse::Correlation(breakdown::correlation(dataset, *sex)?)
        }
        ViewRequest::ChestPain { sex } => {
            ViewResponse::ChestPain(breakdown::chest_pain(dataset, *sex)?)
        }
        ViewRequest::Table(params) => ViewResponse::Table(table::table_view(dataset, params)?),
        ViewRequest::Detail {
            table: params,
            selected_row,
        } => {
            let rows = table::table_view(dataset, params)?;
            ViewResponse::Detail(table::lookup_selected(dataset, &rows, *selected_row)?)
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("Erro ao criar gráfico: {detail}")
}
