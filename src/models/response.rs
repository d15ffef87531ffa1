use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::validation::FieldErrors;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
}

impl ValidationErrorResponse {
    pub fn new(errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: "Validation failed".to_string(),
            errors,
        }
    }
}
