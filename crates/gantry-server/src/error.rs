//! Wire-level error mapping for the workload API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gantry_core::CoreError;
use gantry_reconcile::ReconcileError;
use serde_json::json;

/// Error surfaced by an API handler.
///
/// Splits the decoding boundary (`Validation`) from engine failures
/// (`Reconcile`); the HTTP status is derived from the variant, the body
/// carries the display message and category.
#[derive(Debug)]
pub enum ApiError {
    /// The request body failed descriptor validation.
    Validation(CoreError),
    /// A lifecycle operation failed.
    Reconcile(ReconcileError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Validation(err)
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        Self::Reconcile(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Reconcile(err) => match err {
                ReconcileError::AlreadyExists { .. } => StatusCode::CONFLICT,
                ReconcileError::NotFound { .. } => StatusCode::NOT_FOUND,
                ReconcileError::ClusterOperationFailed(_) => StatusCode::BAD_GATEWAY,
                ReconcileError::RecordPersistFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn category(&self) -> String {
        match self {
            Self::Validation(err) => err.category().to_string(),
            Self::Reconcile(err) => err.category().to_string(),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Reconcile(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(category = %self.category(), "Request failed: {}", self.message());
        }
        let body = json!({
            "error": self.message(),
            "category": self.category(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_cluster::GatewayError;
    use gantry_storage::StorageError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation(CoreError::invalid_name("must not be empty")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Reconcile(ReconcileError::already_exists("svc-a", "default")),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Reconcile(ReconcileError::not_found("record 42")),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Reconcile(ReconcileError::ClusterOperationFailed(
                    GatewayError::connection("down"),
                )),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::Reconcile(ReconcileError::RecordPersistFailed(StorageError::internal(
                    "boom",
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let err = ApiError::Reconcile(ReconcileError::already_exists("svc-a", "default"));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["category"], "conflict");
        assert_eq!(body["error"], "Workload default/svc-a already exists");
    }
}
