use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::validation::{integer_field, non_blank, string_field, FieldErrors, RawFields};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub task_id: i64,
    pub user_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub task_id: i64,
    pub user_id: i64,
    pub comment: String,
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(
        required(message = "The task id field is required."),
        range(min = 1, message = "The task id field must be at least 1.")
    )]
    #[schema(example = 1)]
    pub task_id: Option<i64>,
    #[validate(
        required(message = "The user id field is required."),
        range(min = 1, message = "The user id field must be at least 1.")
    )]
    #[schema(example = 2)]
    pub user_id: Option<i64>,
    #[validate(required(message = "The comment field is required."))]
    #[schema(example = "Plumber booked for Tuesday morning.")]
    pub comment: Option<String>,
}

impl CreateCommentRequest {
    pub fn from_fields(fields: &RawFields, errors: &mut FieldErrors) -> Self {
        CreateCommentRequest {
            task_id: integer_field(fields, "task_id", errors),
            user_id: integer_field(fields, "user_id", errors),
            comment: string_field(fields, "comment", errors),
        }
        .normalized()
    }

    pub fn normalized(mut self) -> Self {
        self.comment = non_blank(self.comment);
        self
    }
}
