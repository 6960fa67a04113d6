use serde::Serialize;
use thiserror::Error;

/// Why a view produced no payload. None of these are fatal: the caller
/// renders the message in place of the chart or table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The filters left nothing to show.
    #[error("{0}")]
    NoData(String),

    /// Unknown variable, missing column or malformed parameter.
    #[error("{0}")]
    InvalidInput(String),

    /// The selected identifier does not resolve to a record.
    #[error("{0}")]
    NotFound(String),

    /// A view panicked; the panic message is kept.
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoData,
    InvalidInput,
    NotFound,
    Internal,
}

impl ViewError {
    pub fn no_data() -> Self {
        ViewError::NoData("Nenhum dado disponível para os filtros selecionados".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ViewError::NoData(_) => ErrorKind::NoData,
            ViewError::InvalidInput(_) => ErrorKind::InvalidInput,
            ViewError::NotFound(_) => ErrorKind::NotFound,
            ViewError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ViewError::NoData(m)
            | ViewError::InvalidInput(m)
            | ViewError::NotFound(m)
            | ViewError::Internal(m) => m,
        }
    }
}

pub type ViewResult<T> = Result<T, ViewError>;
