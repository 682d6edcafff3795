use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};

/// The result of a mutating dashboard action.
///
/// On success the caller must re-fetch the list named by `revalidate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The dashboard list that is now stale.
    pub revalidate: &'static str,
}

impl ActionOutcome {
    pub fn ok(revalidate: &'static str) -> Self {
        Self {
            success: true,
            error: None,
            revalidate,
        }
    }

    pub fn failed(revalidate: &'static str, error: &AppError) -> Self {
        Self {
            success: false,
            error: Some(error.public_message()),
            revalidate,
        }
    }
}

/// Renders the outcome of a mutation. Failures keep the error's status code.
pub fn respond<T>(revalidate: &'static str, result: Result<T>) -> Response {
    match result {
        Ok(_) => (StatusCode::OK, Json(ActionOutcome::ok(revalidate))).into_response(),
        Err(e) => (e.status_code(), Json(ActionOutcome::failed(revalidate, &e))).into_response(),
    }
}
