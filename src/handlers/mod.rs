pub mod comment;
pub mod fallback;
pub mod health;
pub mod task;

use actix_web::{web, HttpMessage, HttpRequest};
use serde_json::Value;

use crate::utils::errors::{malformed_body, query_config, ServiceError};
use crate::utils::validation::RawFields;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decodes a JSON or url-encoded request body into named fields.
///
/// A missing body and a top-level empty JSON array both mean "no fields", so
/// they reach validation instead of failing as a whole.
pub fn decode_body(req: &HttpRequest, body: &[u8]) -> Result<RawFields, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawFields::new());
    }

    if req.content_type().eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).map_err(|e| malformed_body(&e))?;
        return Ok(pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(Value::Array(items)) if items.is_empty() => Ok(RawFields::new()),
        Ok(other) => Err(malformed_body(&format!("unexpected top-level value {}", other))),
        Err(e) => Err(malformed_body(&e)),
    }
}

/// Registers every route. The app must also install
/// [`fallback::not_found`] as its default service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure(cfg);

    cfg.app_data(query_config()).service(
        web::scope("/api")
            .configure(task::configure)
            .configure(comment::configure),
    );
}
