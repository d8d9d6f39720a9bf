pub mod email_service;
pub mod lifecycle;

pub use email_service::EmailService;
pub use lifecycle::AccountLifecycle;
