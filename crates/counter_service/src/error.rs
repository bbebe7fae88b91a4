use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use counter_core::{RequestError, SchemaError};
use thiserror::Error;

use crate::ErrorBody;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("Invalid content type. Expected JSON data.")]
    UnsupportedContentType(String),
    #[error("Failed to parse JSON data. Check data format.")]
    Parse(String),
    #[error("Expected JSON data containing two fields: id, message ({0})")]
    Schema(SchemaError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProcessError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProcessError::UnsupportedContentType(_)
            | ProcessError::Parse(_)
            | ProcessError::Schema(_) => StatusCode::BAD_REQUEST,
            ProcessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl From<RequestError> for ProcessError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Parse(detail) => ProcessError::Parse(detail),
            RequestError::Schema(schema) => ProcessError::Schema(schema),
        }
    }
}

impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
