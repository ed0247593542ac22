// Store proxy errors.
// Maps handler failures to a status code and a JSON error body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::FolioError;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Malformed document: {0}")]
    MalformedPayload(String),

    #[error("Work not found: {0}")]
    WorkNotFound(String),

    #[error(transparent)]
    Backend(#[from] FolioError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ProxyError::WorkNotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::Backend(ref e) => {
                error!(error = %e, "store backend failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
