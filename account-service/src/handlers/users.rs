/// Profile handlers for the authenticated account.
/// Field updates are allow-listed; the verification sub-state is never
/// writable here.
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};

use crate::db::user_repo::{self, UpdateProfileFields};
use crate::error::{AppError, ErrorResponse, Result};
use crate::middleware::UserId;
use crate::models::{
    CareerAspiration, Certification, EngagementStatus, LearningAvailability, LearningPreference,
    PreferredLanguage, ProfileResponse, Qualification, SkillType, Skills, WorkExperience,
};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub career_aspiration: Option<CareerAspiration>,
    pub engagement_status: Option<EngagementStatus>,
    pub qualification: Option<Qualification>,
    pub skills: Option<Skills>,
    pub work_experience: Option<Vec<WorkExperience>>,
    pub certifications: Option<Vec<Certification>>,
    pub preferred_languages: Option<Vec<PreferredLanguage>>,
    pub learning_availability: Option<LearningAvailability>,
    pub learning_preference: Option<LearningPreference>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: ProfileResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddSkillRequest {
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    pub skill: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SkillTypeQuery {
    #[serde(rename = "type")]
    pub skill_type: SkillType,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SkillsResponse {
    pub message: String,
    pub skills: Skills,
}

/// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(state: web::Data<AppState>, user: UserId) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(&state.db, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}

/// PUT /api/users/me
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UpdateProfileResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: UserId,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();

    if let Some(name) = &payload.name {
        if name.is_empty() || name.len() > 100 {
            return Err(AppError::Validation(
                "Name must be between 1 and 100 characters".to_string(),
            ));
        }
    }

    let fields = UpdateProfileFields {
        name: payload.name,
        career_aspiration: payload.career_aspiration.map(Json),
        engagement_status: payload.engagement_status,
        qualification: payload.qualification,
        skills: payload.skills.map(Json),
        work_experience: payload.work_experience.map(Json),
        certifications: payload.certifications.map(Json),
        preferred_languages: payload.preferred_languages.map(Json),
        learning_availability: payload.learning_availability.map(Json),
        learning_preference: payload.learning_preference,
    };

    let user = user_repo::update_profile(&state.db, user.0, fields)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: ProfileResponse::from(user),
    }))
}

/// POST /api/users/me/skills
#[utoipa::path(
    post,
    path = "/api/users/me/skills",
    tag = "Users",
    request_body = AddSkillRequest,
    responses(
        (status = 201, description = "Skill added", body = SkillsResponse),
        (status = 400, description = "Bad type, empty skill, or duplicate", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_skill(
    state: web::Data<AppState>,
    user: UserId,
    payload: web::Json<AddSkillRequest>,
) -> Result<HttpResponse> {
    let skill = payload.skill.trim();
    if skill.is_empty() {
        return Err(AppError::Validation("Skill is required".to_string()));
    }

    let account = user_repo::find_by_id(&state.db, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut skills = account.skills.0;
    if !skills.add(payload.skill_type, skill) {
        return Err(AppError::Validation("Skill already exists".to_string()));
    }

    user_repo::update_skills(&state.db, account.id, &skills).await?;

    Ok(HttpResponse::Created().json(SkillsResponse {
        message: "Skill added successfully".to_string(),
        skills,
    }))
}

/// DELETE /api/users/me/skills/{skill}?type=technical|soft
#[utoipa::path(
    delete,
    path = "/api/users/me/skills/{skill}",
    tag = "Users",
    params(
        ("skill" = String, Path, description = "Skill to remove"),
        SkillTypeQuery
    ),
    responses(
        (status = 200, description = "Skill removed", body = SkillsResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Skill not present", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_skill(
    state: web::Data<AppState>,
    user: UserId,
    path: web::Path<String>,
    query: web::Query<SkillTypeQuery>,
) -> Result<HttpResponse> {
    let skill = path.into_inner();

    let account = user_repo::find_by_id(&state.db, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut skills = account.skills.0;
    if !skills.remove(query.skill_type, &skill) {
        return Err(AppError::NotFound("Skill not found".to_string()));
    }

    user_repo::update_skills(&state.db, account.id, &skills).await?;

    Ok(HttpResponse::Ok().json(SkillsResponse {
        message: "Skill removed successfully".to_string(),
        skills,
    }))
}
