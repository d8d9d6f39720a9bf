use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Employment situation, matching database engagement_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "engagement_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EngagementStatus {
    Student,
    Employed,
    SelfEmployed,
    Unemployed,
    Apprentice,
}

/// Highest attained qualification, matching database qualification_level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "qualification_level")]
pub enum Qualification {
    #[sqlx(rename = "8th")]
    #[serde(rename = "8th")]
    Eighth,
    #[sqlx(rename = "10th")]
    #[serde(rename = "10th")]
    Tenth,
    #[sqlx(rename = "12th")]
    #[serde(rename = "12th")]
    Twelfth,
    #[sqlx(rename = "iti")]
    #[serde(rename = "iti")]
    Iti,
    #[sqlx(rename = "diploma")]
    #[serde(rename = "diploma")]
    Diploma,
    #[sqlx(rename = "ug")]
    #[serde(rename = "ug")]
    Ug,
    #[sqlx(rename = "pg")]
    #[serde(rename = "pg")]
    Pg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "learning_preference", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LearningPreference {
    Video,
    Reading,
    HandsOn,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Technical,
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PreferredLanguage {
    English,
    Hindi,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Marathi,
    Bengali,
    Gujarati,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionStatus {
    Completed,
    InProgress,
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PreferredMode {
    Online,
    Offline,
    Hybrid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CareerAspiration {
    pub target_job_role: Option<String>,
    pub target_sector: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct WorkExperience {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub years: Option<f32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Certification {
    pub course_name: Option<String>,
    pub provider: Option<String>,
    pub duration: Option<String>,
    pub completion_status: Option<CompletionStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LearningAvailability {
    pub hours_per_week: Option<i32>,
    pub preferred_mode: Option<PreferredMode>,
}

/// Technical and soft skill lists, stored as one JSONB document
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

impl Skills {
    fn list_mut(&mut self, kind: SkillType) -> &mut Vec<String> {
        match kind {
            SkillType::Technical => &mut self.technical,
            SkillType::Soft => &mut self.soft,
        }
    }

    /// Add a skill; returns false if it is already present
    pub fn add(&mut self, kind: SkillType, skill: &str) -> bool {
        let list = self.list_mut(kind);
        if list.iter().any(|s| s == skill) {
            return false;
        }
        list.push(skill.to_string());
        true
    }

    /// Remove a skill; returns false if it was not present
    pub fn remove(&mut self, kind: SkillType, skill: &str) -> bool {
        let list = self.list_mut(kind);
        let before = list.len();
        list.retain(|s| s != skill);
        list.len() != before
    }
}

/// Account row - the sole entity owned by this service
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    // Verification sub-state
    pub is_verified: bool,
    pub otp: Option<String>,
    pub otp_expires: Option<DateTime<Utc>>,
    // Profile
    pub career_aspiration: Option<Json<CareerAspiration>>,
    pub engagement_status: Option<EngagementStatus>,
    pub qualification: Option<Qualification>,
    pub skills: Json<Skills>,
    pub work_experience: Json<Vec<WorkExperience>>,
    pub certifications: Json<Vec<Certification>>,
    pub preferred_languages: Json<Vec<PreferredLanguage>>,
    pub learning_availability: Option<Json<LearningAvailability>>,
    pub learning_preference: Option<LearningPreference>,
    pub is_profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile projection returned to clients.
/// Never includes the password hash or the verification sub-state.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub career_aspiration: Option<CareerAspiration>,
    pub engagement_status: Option<EngagementStatus>,
    pub qualification: Option<Qualification>,
    pub skills: Skills,
    pub work_experience: Vec<WorkExperience>,
    pub certifications: Vec<Certification>,
    pub preferred_languages: Vec<PreferredLanguage>,
    pub learning_availability: Option<LearningAvailability>,
    pub learning_preference: Option<LearningPreference>,
    pub is_profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            career_aspiration: user.career_aspiration.map(|j| j.0),
            engagement_status: user.engagement_status,
            qualification: user.qualification,
            skills: user.skills.0,
            work_experience: user.work_experience.0,
            certifications: user.certifications.0,
            preferred_languages: user.preferred_languages.0,
            learning_availability: user.learning_availability.map(|j| j.0),
            learning_preference: user.learning_preference,
            is_profile_complete: user.is_profile_complete,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
