// rest/error.rs — `HabitError` → HTTP status mapping.
//
// The core never produces HTTP semantics; this is the only place where
// error kinds become status codes. Validation → 400, storage and
// internal faults → 500. The body always carries the kind so clients
// can tell bad input from system failure without string inspection.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::error::HabitError;

pub struct ApiError(pub HabitError);

impl From<HabitError> for ApiError {
    fn from(e: HabitError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            HabitError::InvalidDate(_) | HabitError::InvalidRange(_) => {
                (StatusCode::BAD_REQUEST, "validation")
            }
            HabitError::Storage(_) | HabitError::Corrupt { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage")
            }
            HabitError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        if status.is_server_error() {
            error!(err = %self.0, kind, "request failed");
        } else {
            warn!(err = %self.0, "request rejected");
        }

        (
            status,
            Json(json!({ "error": self.0.to_string(), "kind": kind })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let resp = ApiError(HabitError::InvalidDate("nope".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_maps_to_internal_server_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let resp = ApiError(HabitError::Storage(io)).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
