//! Route configuration
//!
//! Centralized route setup: public auth endpoints, bearer-protected
//! profile endpoints, health and API docs.

use crate::handlers;
use crate::middleware::JwtAuthMiddleware;
use crate::security::TokenIssuer;
use actix_web::{web, HttpResponse};

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig, tokens: TokenIssuer) {
    cfg.route("/api/openapi.json", web::get().to(openapi_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health_check))
                .configure(routes::auth::configure)
                .configure(|c| routes::users::configure(c, tokens)),
        );
}

/// OpenAPI JSON endpoint
async fn openapi_handler() -> HttpResponse {
    use utoipa::OpenApi;
    HttpResponse::Ok()
        .content_type("application/json")
        .json(crate::openapi::ApiDoc::openapi())
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod auth {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .route("/verify-otp", web::post().to(handlers::verify_otp))
                    .route("/resend-otp", web::post().to(handlers::resend_otp)),
            );
        }
    }

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig, tokens: TokenIssuer) {
            cfg.service(
                web::scope("/users")
                    .wrap(JwtAuthMiddleware::new(tokens))
                    .route("/me", web::get().to(handlers::get_profile))
                    .route("/me", web::put().to(handlers::update_profile))
                    .route("/me/skills", web::post().to(handlers::add_skill))
                    .route("/me/skills/{skill}", web::delete().to(handlers::remove_skill)),
            );
        }
    }
}
