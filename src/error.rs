use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A token signing or verification error.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// The upstream request could not be sent or its body not read.
    #[error("Upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream backend answered with a non-2xx status.
    #[error("API request failed: {status} {status_text}{}", fmt_body(.body))]
    Upstream {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The upstream backend answered 2xx with a body we cannot use.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    /// The identity profile cannot establish a session.
    #[error("Sign-in rejected: {0}")]
    SignInRejected(String),

    /// An authentication error.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No session is established.
    #[error("Authorization failed")]
    Unauthorized,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required configuration is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A row is missing a column we rely on.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

fn fmt_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {}", body)
    }
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        AppError::Validation(report.to_string())
    }
}

impl AppError {
    /// The status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Redis(_)
            | AppError::Token(_)
            | AppError::Configuration(_)
            | AppError::MissingData(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Transport(_) | AppError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::SignInRejected(_) | AppError::Authentication(_) | AppError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The message shown to the dashboard. Infrastructure details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                "Database error".to_string()
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                "Session store error".to_string()
            }
            AppError::Token(e) => {
                tracing::error!("Token error: {}", e);
                "Token error".to_string()
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::MissingData(msg) => {
                tracing::error!("Missing data: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Transport(e) => {
                tracing::error!("Upstream transport error: {}", e);
                "Backend unavailable".to_string()
            }
            AppError::InvalidResponse(msg) => {
                tracing::error!("Invalid upstream response: {}", msg);
                "Invalid backend response".to_string()
            }
            AppError::Upstream { .. } => {
                tracing::warn!("{}", self);
                self.to_string()
            }
            AppError::SignInRejected(msg) | AppError::Authentication(msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                msg.clone()
            }
            AppError::Unauthorized => {
                tracing::warn!("Authorization failed");
                "Unauthorized".to_string()
            }
            AppError::NotFound => {
                tracing::debug!("Resource not found");
                "Resource not found".to_string()
            }
            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.public_message();

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(http::header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_carries_status_text_and_body() {
        let err = AppError::Upstream {
            status: 404,
            status_text: "Not Found".to_string(),
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "API request failed: 404 Not Found - not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_message_omits_empty_body() {
        let err = AppError::Upstream {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            body: String::new(),
        };
        assert_eq!(err.to_string(), "API request failed: 500 Internal Server Error");
    }

    #[test]
    fn sign_in_rejection_is_unauthorized() {
        let err = AppError::SignInRejected("Profile is missing required fields".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
