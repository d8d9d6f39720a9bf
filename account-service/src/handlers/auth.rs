/// Authentication handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, ErrorResponse, Result};
use crate::validators;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(equal = 6))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ResendOtpRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Login response with the bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Register endpoint handler
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification code sent", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Verification code delivery failed", body = ErrorResponse)
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    if !validators::validate_password(&payload.password) {
        return Err(AppError::Validation(
            "Password must be 8+ chars with uppercase, lowercase, digit, and special char"
                .to_string(),
        ));
    }

    state
        .lifecycle
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "Registration successful. A verification code has been sent to your email."
            .to_string(),
    }))
}

/// Login endpoint handler
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password", body = ErrorResponse),
        (status = 403, description = "Account not verified", body = ErrorResponse)
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    // Unknown emails and wrong passwords are indistinguishable to clients
    let outcome = match state.lifecycle.login(&payload.email, &payload.password).await {
        Err(AppError::NotFound(_)) => return Err(AppError::InvalidCredentials),
        other => other?,
    };

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: outcome.token,
        token_type: "Bearer".to_string(),
        expires_in: outcome.expires_in,
    }))
}

/// Verify-OTP endpoint handler
#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    tag = "Auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid, expired, or already-used code", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse)
    )
)]
pub async fn verify_otp(
    state: web::Data<AppState>,
    payload: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    if !validators::validate_otp_format(&payload.otp) {
        return Err(AppError::Validation(
            "Verification code must be 6 digits".to_string(),
        ));
    }

    state.lifecycle.verify_otp(&payload.email, &payload.otp).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Email verified successfully. You can now log in.".to_string(),
    }))
}

/// Resend-OTP endpoint handler
#[utoipa::path(
    post,
    path = "/api/auth/resend-otp",
    tag = "Auth",
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "New verification code sent", body = MessageResponse),
        (status = 400, description = "Account already verified", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
        (status = 500, description = "Verification code delivery failed", body = ErrorResponse)
    )
)]
pub async fn resend_otp(
    state: web::Data<AppState>,
    payload: web::Json<ResendOtpRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    state.lifecycle.resend_otp(&payload.email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "A new verification code has been sent to your email.".to_string(),
    }))
}
