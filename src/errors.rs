use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::api::validation::ValidationDetails;

/// Uniform error body returned by every route.
#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub code: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Who caused a failure, which decides between a 4xx and a 5xx answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Client,
    Server,
}

/// Errors raised while handling a request.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(ValidationDetails),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("{message}")]
    Engine { status: StatusCode, message: String },
}

impl AppError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::Database(_) | AppError::Internal(_) => ErrorClass::Server,
            AppError::Engine { status, .. } if status.is_server_error() => ErrorClass::Server,
            _ => ErrorClass::Client,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AppError::Database(_) => "DB_ERROR",
            AppError::Internal(_) => "INTERNAL",
            AppError::Engine { .. } => "HTTP_ERROR",
        }
    }

    /// Maps a status produced by the HTTP engine itself (no route, wrong
    /// method, rejected origin) onto the taxonomy.
    pub fn from_status(status: StatusCode) -> Self {
        let reason = status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();

        match status {
            StatusCode::BAD_REQUEST => AppError::BadRequest(reason),
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(reason),
            StatusCode::FORBIDDEN => AppError::Forbidden(reason),
            StatusCode::NOT_FOUND => AppError::NotFound(reason),
            StatusCode::METHOD_NOT_ALLOWED => AppError::MethodNotAllowed,
            StatusCode::CONFLICT => AppError::Conflict(reason),
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
            StatusCode::INTERNAL_SERVER_ERROR => AppError::Internal(reason),
            status => AppError::Engine {
                status,
                message: reason,
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationDetails::from(&errors))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Engine { status, .. } => *status,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self.class() {
            ErrorClass::Server => {
                // Internals stay in the log.
                log::error!("{} {}: {}", status.as_u16(), self.code(), self);
                "Internal server error".to_string()
            }
            ErrorClass::Client => self.to_string(),
        };
        let details = match self {
            AppError::Validation(details) => serde_json::to_value(details).ok(),
            _ => None,
        };

        let body = ErrorResponse {
            code: self.code(),
            message,
            details,
        };
        HttpResponse::build(status).json(body)
    }
}

/// Failures that stop the process before it serves a single request.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database unavailable: {0}")]
    Database(String),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server terminated with error: {0}")]
    Serve(#[source] std::io::Error),
}
