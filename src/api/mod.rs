//! Axum HTTP handlers.

pub mod health;
pub mod query;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::models::ErrorBody;
use crate::state::AppState;

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/query", post(query::query_docs))
        .route("/health", get(health::health_check))
        .with_state(state)
}

/// An HTTP error with a fixed, client-safe message. Internal error details
/// are logged server-side, never returned to callers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn missing_params() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Missing required parameters",
        }
    }

    pub fn load_failed() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to load repository",
        }
    }

    pub fn query_failed() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Query failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message.to_string(),
            }),
        )
            .into_response()
    }
}
