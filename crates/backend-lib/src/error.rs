// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Application error types.
///
/// Validation failures and lookup misses never reach this type; handlers
/// recover those inline and re-render the view. What remains here is the
/// infrastructure taxonomy that propagates out of a handler via `?`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Mail transport error: {0}")]
    Mail(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Session token error: {0}")]
    SessionToken(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmailTaken => StatusCode::BAD_REQUEST,
            AppError::SessionToken(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::EmailTaken => "Email is already registered".to_string(),
            AppError::SessionToken(_) => "Session could not be established".to_string(),
            _ => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = crate::views::render_error_page(status.as_u16(), &message);

        (status, Html(body)).into_response()
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
