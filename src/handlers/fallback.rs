use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::AppConfig;
use crate::models::response::ErrorResponse;

/// Answers every request no route claimed.
pub async fn not_found(req: HttpRequest, config: web::Data<AppConfig>) -> HttpResponse {
    log::warn!("No route for {} {}", req.method(), req.path());

    HttpResponse::NotFound().json(ErrorResponse::new(format!(
        "This route does not exist. Check documentation at {}",
        config.docs_url
    )))
}
