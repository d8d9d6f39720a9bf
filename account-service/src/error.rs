use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is not verified")]
    Unverified,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid verification code")]
    InvalidOtp,

    #[error("Verification code has expired")]
    OtpExpired,

    #[error("Account is already verified")]
    AlreadyVerified,

    #[error("Email delivery failed: {0}")]
    Delivery(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidCredentials => "AUTHENTICATION_ERROR",
            AppError::Unverified => "ACCOUNT_UNVERIFIED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InvalidOtp => "INVALID_OTP",
            AppError::OtpExpired => "OTP_EXPIRED",
            AppError::AlreadyVerified => "ALREADY_VERIFIED",
            AppError::Delivery(_) => "EMAIL_ERROR",
            AppError::Token(_) => "TOKEN_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unverified => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidOtp => StatusCode::BAD_REQUEST,
            AppError::OtpExpired => StatusCode::BAD_REQUEST,
            AppError::AlreadyVerified => StatusCode::BAD_REQUEST,
            AppError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Internal failures are logged server-side and reported without
        // details; everything else is safe to surface verbatim.
        let message = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_string()
            }
            AppError::Delivery(e) => {
                tracing::error!(error = %e, "email delivery failed");
                "Failed to send verification email".to_string()
            }
            AppError::Token(e) => {
                tracing::debug!(error = %e, "token rejected");
                "Invalid or expired token".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status_code).json(ErrorResponse {
            error: self.error_type().to_string(),
            message,
        })
    }
}

// Convert validator errors to AppError
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

// Convert lettre errors to AppError
impl From<lettre::error::Error> for AppError {
    fn from(error: lettre::error::Error) -> Self {
        AppError::Delivery(error.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        AppError::Delivery(error.to_string())
    }
}

/// The store-level unique index on email is the only safety net against
/// racing registrations; its violation must read as a conflict.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
