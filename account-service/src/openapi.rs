use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorResponse;
use crate::handlers::auth::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, ResendOtpRequest,
    VerifyOtpRequest,
};
use crate::handlers::health::HealthResponse;
use crate::handlers::users::{
    AddSkillRequest, SkillsResponse, UpdateProfileRequest, UpdateProfileResponse,
};
use crate::models::{
    CareerAspiration, Certification, CompletionStatus, EngagementStatus, LearningAvailability,
    LearningPreference, PreferredLanguage, PreferredMode, ProfileResponse, Qualification,
    SkillType, Skills, WorkExperience,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Upskill Account Service",
        description = "Registration, email OTP verification, login, and learner profiles"
    ),
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::verify_otp,
        crate::handlers::auth::resend_otp,
        crate::handlers::users::get_profile,
        crate::handlers::users::update_profile,
        crate::handlers::users::add_skill,
        crate::handlers::users::remove_skill,
    ),
    components(schemas(
        ErrorResponse,
        HealthResponse,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        VerifyOtpRequest,
        ResendOtpRequest,
        MessageResponse,
        UpdateProfileRequest,
        UpdateProfileResponse,
        AddSkillRequest,
        SkillsResponse,
        ProfileResponse,
        CareerAspiration,
        Certification,
        CompletionStatus,
        EngagementStatus,
        LearningAvailability,
        LearningPreference,
        PreferredLanguage,
        PreferredMode,
        Qualification,
        SkillType,
        Skills,
        WorkExperience,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Account lifecycle: register, verify, login"),
        (name = "Users", description = "Authenticated profile management"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
