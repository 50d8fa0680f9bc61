//! API error type and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use miner_ledger::LedgerError;
use tracing::error;

/// Wrapper turning a [`LedgerError`] into an HTTP response.
///
/// Business-rule violations surface their reason verbatim to the end user;
/// store failures are logged and masked.
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        miner_metrics::record_rejection(self.0.error_type());

        let (status, message) = match &self.0 {
            LedgerError::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            LedgerError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            LedgerError::Forbidden => (StatusCode::FORBIDDEN, self.0.to_string()),
            LedgerError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            LedgerError::Store(e) => {
                error!("store failure: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "storage temporarily unavailable".to_string(),
                )
            }
            // Business rules: DailyLimitReached, NotYetEligible, BelowMinimum,
            // InsufficientBalance, SelfReferral, AlreadyReferred, InvalidCode.
            _ => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
