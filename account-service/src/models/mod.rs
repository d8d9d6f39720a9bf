pub mod user;

pub use user::{
    CareerAspiration, Certification, CompletionStatus, EngagementStatus, LearningAvailability,
    LearningPreference, PreferredLanguage, PreferredMode, ProfileResponse, Qualification,
    SkillType, Skills, User, WorkExperience,
};
