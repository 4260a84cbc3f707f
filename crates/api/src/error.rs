//! Unified error handling for the API.
//!
//! Every error rendered to a client is a JSON body of the form
//! `{"message": "..."}`. Internal causes are logged server-side only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type for route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request from client; the message names the problem.
    #[error("{0}")]
    BadRequest(String),

    /// Missing or wrong admin bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Server-side failure. Carries only the public message; the underlying
    /// cause was logged where the error was produced.
    #[error("{0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Wrap a server-side failure: log the real cause, keep the generic
/// route-supplied message for the client.
pub fn internal(err: impl std::fmt::Display, public_message: &str) -> ApiError {
    tracing::error!(error = %err, "{public_message}");
    ApiError::Internal(public_message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(ApiError::BadRequest("Items are required".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::NotFound("Order not found".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Internal("Error creating order".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_carries_public_message() {
        let err = ApiError::BadRequest("Total is required".into());
        assert_eq!(err.to_string(), "Total is required");
    }

    #[test]
    fn test_internal_hides_cause() {
        let err = internal("connection refused", "Error creating order");
        assert_eq!(err.to_string(), "Error creating order");
    }
}
