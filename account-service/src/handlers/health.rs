use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /api/health
///
/// Reports liveness and checks that the credential store is reachable.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Credential store unreachable")
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    if let Err(e) = sqlx::query("SELECT 1").execute(&state.db).await {
        tracing::error!(error = %e, "health check failed: database unreachable");
        return HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "degraded".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        });
    }

    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
