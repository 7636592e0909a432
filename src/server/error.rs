//! Mapping of ledger errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::LedgerError;

/// Error wrapper for converting ledger errors to HTTP responses.
pub struct ApiError(pub LedgerError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            LedgerError::InvalidRequest(_)
            | LedgerError::InvalidType(_)
            | LedgerError::IncompleteData(_) => StatusCode::BAD_REQUEST,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::CorruptRecord(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LedgerError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({
            "success": false,
            "error": self.0.to_string()
        });

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}
