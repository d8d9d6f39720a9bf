use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

/// Application configuration, loaded once at startup and injected into
/// every component. Business code never reads the process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub otp: OtpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub env: String,

    #[serde(default = "default_app_host")]
    pub host: String,

    #[serde(default = "default_app_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,

    #[serde(default = "default_jwt_access_ttl")]
    pub access_token_ttl: i64,
}

/// SMTP settings. An empty host puts the mail dispatcher in no-op mode,
/// useful for development and tests without mail infrastructure.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    #[serde(default = "default_smtp_from")]
    pub smtp_from: String,

    #[serde(default)]
    pub use_starttls: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    #[serde(default = "default_otp_ttl_minutes")]
    pub ttl_minutes: i64,
}

// Default value functions
fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_db_max_connections() -> u32 {
    20
}

fn default_jwt_access_ttl() -> i64 {
    3600 // 1 hour
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_from() -> String {
    "Upskill <noreply@upskill.dev>".to_string()
}

fn default_otp_ttl_minutes() -> i64 {
    10
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("APP_HOST").unwrap_or_else(|_| default_app_host()),
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| default_app_port().to_string())
                .parse()
                .context("Invalid APP_PORT")?,
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| default_db_max_connections().to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: env::var("JWT_ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| default_jwt_access_ttl().to_string())
                .parse()
                .context("Invalid JWT_ACCESS_TOKEN_TTL")?,
        };

        let email = EmailConfig {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| default_smtp_port().to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| default_smtp_from()),
            use_starttls: env::var("SMTP_USE_STARTTLS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        let otp = OtpConfig {
            ttl_minutes: env::var("OTP_TTL_MINUTES")
                .unwrap_or_else(|_| default_otp_ttl_minutes().to_string())
                .parse()
                .context("Invalid OTP_TTL_MINUTES")?,
        };

        Ok(Config {
            app,
            database,
            jwt,
            email,
            otp,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }
}
