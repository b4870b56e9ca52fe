use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Every failure a handler can surface to a client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    InvalidPassword(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    EmailAlreadyTaken(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Body written for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: &'static str,
    pub description: &'static str,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials(_)
            | AppError::InvalidPassword(_)
            | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyTaken(_) => StatusCode::CONFLICT,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED_ERROR",
            AppError::InvalidCredentials(_) => "INVALID_CREDENTIALS_ERROR",
            AppError::InvalidPassword(_) => "INVALID_PASSWORD_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN_ERROR",
            AppError::NotFound(_) => "NOT_FOUND_ERROR",
            AppError::EmailAlreadyTaken(_) => "EMAIL_ALREADY_TAKEN_ERROR",
            AppError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Invalid request",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::InvalidCredentials(_) => "Invalid credentials",
            AppError::InvalidPassword(_) => "Invalid password",
            AppError::Forbidden(_) => "Access forbidden",
            AppError::NotFound(_) => "Resource not found",
            AppError::EmailAlreadyTaken(_) => "Email is already taken",
            AppError::UnprocessableEntity(_) => "Unprocessable entity",
            AppError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            error: self.code(),
            description: self.description(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
