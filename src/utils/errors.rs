use actix_web::error::QueryPayloadError;
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::response::{ErrorResponse, ValidationErrorResponse};
use crate::utils::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database Error: {0}")]
    DatabaseError(String),
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// A single-field validation failure.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        ServiceError::Validation(errors)
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::DatabaseError(_) | ServiceError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            ServiceError::Validation(errors) => {
                log::warn!("Validation failed on: {:?}", errors.fields().collect::<Vec<_>>());
                response.json(ValidationErrorResponse::new(errors.clone()))
            }
            ServiceError::Unauthorized(msg) => {
                log::warn!("Unauthorized: {}", msg);
                response.json(ErrorResponse::new(msg.clone()))
            }
            ServiceError::DatabaseError(msg) => {
                log::error!("Database Error: {}", msg);
                // Don't expose database details
                response.json(ErrorResponse::new("Database operation failed"))
            }
            ServiceError::InternalError(msg) => {
                log::error!("Internal Error: {}", msg);
                response.json(ErrorResponse::new("Something went wrong"))
            }
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::DatabaseError(err.to_string())
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::DatabaseError(format!("{:#}", err))
    }
}

/// The body could not be decoded into named fields at all.
pub fn malformed_body(detail: &dyn std::fmt::Display) -> ServiceError {
    log::debug!("Rejected request payload: {}", detail);
    ServiceError::invalid("body", "The request body must be a JSON object or form data.")
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected query string: {}", err);
    ServiceError::invalid("query", "The query string could not be parsed.").into()
}

/// Query extractor config that turns parse errors into 422 responses.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
