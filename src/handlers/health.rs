use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::repository::Repository;

/// Service and storage health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Storage reachable"),
        (status = 503, description = "Storage unreachable")
    )
)]
pub async fn health_check(repo: web::Data<dyn Repository>) -> Result<HttpResponse> {
    match repo.ping().await {
        Ok(_) => {
            let stats = repo.stats().await.unwrap_or_default();

            Ok(HttpResponse::Ok().json(json!({
                "status": "ok",
                "message": "Maintenance Backend API is running",
                "database": "connected",
                "stats": stats
            })))
        }
        Err(e) => {
            log::error!("Database health check failed: {}", e);
            Ok(HttpResponse::ServiceUnavailable().json(json!({
                "status": "error",
                "message": "Database connection failed"
            })))
        }
    }
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "name": "Maintenance Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "REST API for building maintenance tasks"
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/", web::get().to(index));
}
