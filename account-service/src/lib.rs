pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};

use crate::security::TokenIssuer;
use crate::services::{AccountLifecycle, EmailService};
use sqlx::PgPool;
use std::sync::Arc;

/// Central application state - single source of truth.
/// All dependencies are wired here once; handlers reach everything
/// through this struct.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub lifecycle: AccountLifecycle,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        tracing::info!("Initializing application state...");

        let db = db::create_pool(&config.database.url, config.database.max_connections).await?;
        tracing::info!(
            "Database pool created with {} max connections",
            config.database.max_connections
        );

        if !config.is_production() {
            tracing::info!("Running database migrations...");
            match db::run_migrations(&db).await {
                Ok(_) => tracing::info!("Migrations completed"),
                Err(e) => {
                    // Tolerate migration errors in dev (may have version mismatches)
                    tracing::warn!("Migration error (tolerated in non-prod): {:#}", e);
                }
            }
        }

        let tokens = TokenIssuer::new(&config.jwt);
        let mailer = EmailService::new(&config.email)?;
        let lifecycle = AccountLifecycle::new(
            db.clone(),
            mailer,
            tokens.clone(),
            config.otp.ttl_minutes,
        );

        Ok(Self {
            db,
            config: Arc::new(config),
            lifecycle,
            tokens,
        })
    }
}
