pub mod auth;
pub mod health;
pub mod users;

pub use auth::{login, register, resend_otp, verify_otp};
pub use health::health_check;
pub use users::{add_skill, get_profile, remove_skill, update_profile};
