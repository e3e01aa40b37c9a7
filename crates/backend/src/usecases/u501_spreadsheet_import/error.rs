use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::usecases::u501_spreadsheet_import::SessionError;
use serde_json::json;
use thiserror::Error;

/// Ошибки загрузки файла, которые возвращаются клиенту
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file format: {0} (expected .csv or .xlsx)")]
    UnsupportedFormat(String),
    #[error("could not read file: {0}")]
    Parse(String),
    #[error("the file has no header row")]
    EmptyFile,
    #[error("unknown import type: {0}")]
    UnknownImportType(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("file is larger than {limit_mb} MB")]
    FileTooLarge { limit_mb: usize },
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),
    #[error("required fields are not mapped: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
    #[error("could not build template: {0}")]
    Template(#[from] rust_xlsxwriter::XlsxError),
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ImportError {
    pub fn status(&self) -> StatusCode {
        match self {
            ImportError::UnsupportedFormat(_)
            | ImportError::Parse(_)
            | ImportError::EmptyFile
            | ImportError::UnknownImportType(_)
            | ImportError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ImportError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ImportError::InvalidMapping(_) | ImportError::MissingRequired(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ImportError::Template(_) | ImportError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing_fields(&self) -> &[String] {
        match self {
            ImportError::MissingRequired(fields) => fields,
            _ => &[],
        }
    }
}

impl From<SessionError> for ImportError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::MissingRequired(fields) => ImportError::MissingRequired(fields),
            other => ImportError::InvalidMapping(other.to_string()),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::Parse(e.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(e: calamine::XlsxError) -> Self {
        ImportError::Parse(e.to_string())
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Import failed: {}", self);
        } else {
            tracing::warn!("Import rejected: {}", self);
        }
        let body = json!({
            "error": self.to_string(),
            "missingFields": self.missing_fields(),
        });
        (status, Json(body)).into_response()
    }
}
