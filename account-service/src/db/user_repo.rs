/// Account database operations.
/// The verification sub-state (is_verified, otp, otp_expires) is written
/// exclusively through `create_account`, `set_verification_code` and
/// `mark_verified`; profile updates never touch it.
use crate::error::Result;
use crate::models::{
    CareerAspiration, Certification, EngagementStatus, LearningAvailability, LearningPreference,
    PreferredLanguage, Qualification, Skills, User, WorkExperience,
};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Find account by email (case-sensitive exact match, as stored)
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Find account by ID
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Check if email exists
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

/// Create a new account in the pending-verification state with a freshly
/// generated code. Propagates the raw sqlx error so the caller can map a
/// unique-index violation to a conflict.
pub async fn create_account(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    otp: &str,
    otp_expires: DateTime<Utc>,
) -> std::result::Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, is_verified, otp, otp_expires)
        VALUES ($1, $2, $3, false, $4, $5)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(otp)
    .bind(otp_expires)
    .fetch_one(pool)
    .await
}

/// Overwrite the outstanding verification code and its expiry.
/// At most one code exists per account; a new one replaces the old.
pub async fn set_verification_code(
    pool: &PgPool,
    user_id: Uuid,
    otp: &str,
    otp_expires: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET otp = $2, otp_expires = $3, updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(otp)
    .bind(otp_expires)
    .execute(pool)
    .await?;

    Ok(())
}

/// Transition the account to verified and clear the code. Irreversible.
pub async fn mark_verified(pool: &PgPool, user_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET is_verified = true, otp = NULL, otp_expires = NULL, updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Optional fields for allow-listed profile updates
#[derive(Debug, Default)]
pub struct UpdateProfileFields {
    pub name: Option<String>,
    pub career_aspiration: Option<Json<CareerAspiration>>,
    pub engagement_status: Option<EngagementStatus>,
    pub qualification: Option<Qualification>,
    pub skills: Option<Json<Skills>>,
    pub work_experience: Option<Json<Vec<WorkExperience>>>,
    pub certifications: Option<Json<Vec<Certification>>>,
    pub preferred_languages: Option<Json<Vec<PreferredLanguage>>>,
    pub learning_availability: Option<Json<LearningAvailability>>,
    pub learning_preference: Option<LearningPreference>,
}

/// Update profile fields, recomputing profile completeness from the
/// merged row. Required for completeness: name, engagement_status,
/// qualification, learning_availability.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    fields: UpdateProfileFields,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET
            name = COALESCE($2, name),
            career_aspiration = COALESCE($3, career_aspiration),
            engagement_status = COALESCE($4, engagement_status),
            qualification = COALESCE($5, qualification),
            skills = COALESCE($6, skills),
            work_experience = COALESCE($7, work_experience),
            certifications = COALESCE($8, certifications),
            preferred_languages = COALESCE($9, preferred_languages),
            learning_availability = COALESCE($10, learning_availability),
            learning_preference = COALESCE($11, learning_preference),
            is_profile_complete = (
                COALESCE($2, name) IS NOT NULL
                AND COALESCE($4, engagement_status) IS NOT NULL
                AND COALESCE($5, qualification) IS NOT NULL
                AND COALESCE($10, learning_availability) IS NOT NULL
            ),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(fields.name)
    .bind(fields.career_aspiration)
    .bind(fields.engagement_status)
    .bind(fields.qualification)
    .bind(fields.skills)
    .bind(fields.work_experience)
    .bind(fields.certifications)
    .bind(fields.preferred_languages)
    .bind(fields.learning_availability)
    .bind(fields.learning_preference)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Replace the skills document (read-modify-write; last write wins)
pub async fn update_skills(pool: &PgPool, user_id: Uuid, skills: &Skills) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET skills = $2, updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(Json(skills))
    .execute(pool)
    .await?;

    Ok(())
}
