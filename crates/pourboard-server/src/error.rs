//! Error types for the REST gateway.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pourboard_db::DbError;

/// Message returned for blank or missing names.
pub const NAME_REQUIRED: &str = "item name is required";

/// Message returned when a name is already taken.
pub const NAME_TAKEN: &str = "an item with that name already exists";

/// Message returned for unknown item ids.
pub const ITEM_NOT_FOUND: &str = "item not found";

/// Errors that can occur in the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was well-formed but its content was rejected.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested item was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store failed.
    #[error("store error: {0}")]
    Store(DbError),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            // A unique-index violation that slipped past the name check.
            DbError::DuplicateName(_) => Self::Validation(String::from(NAME_TAKEN)),
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("internal store error"),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
