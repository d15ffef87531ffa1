use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::comment::Comment;
use crate::utils::validation::{integer_field, non_blank, parse_positive_id, string_field, FieldErrors, RawFields};

/// Lifecycle state of a maintenance task.
///
/// Stored as the PostgreSQL enum `task_status`; the wire spelling matches the
/// database labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Completed,
    Rejected,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseStatusError(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub building_id: i64,
    pub assigned_to: Option<i64>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task as returned by the building listing, comments eager-loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskWithComments {
    #[serde(flatten)]
    pub task: Task,
    pub comments: Vec<Comment>,
}

/// Row to insert; ids have already been checked against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub building_id: i64,
    pub assigned_to: Option<i64>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(
        required(message = "The title field is required."),
        length(max = 255, message = "The title field must not be greater than 255 characters.")
    )]
    #[schema(example = "Fix Leak in Apartment 5B")]
    pub title: Option<String>,
    #[validate(required(message = "The description field is required."))]
    #[schema(example = "Water leak detected in the bathroom.")]
    pub description: Option<String>,
    #[validate(
        required(message = "The building id field is required."),
        range(min = 1, message = "The building id field must be at least 1.")
    )]
    #[schema(example = 1)]
    pub building_id: Option<i64>,
    #[validate(range(min = 1, message = "The assigned to field must be at least 1."))]
    #[schema(example = 2)]
    pub assigned_to: Option<i64>,
    /// Used only when the request carries no bearer token.
    #[validate(range(min = 1, message = "The created by field must be at least 1."))]
    pub created_by: Option<i64>,
}

impl CreateTaskRequest {
    /// Reads a decoded body; values of the wrong type are recorded in `errors`
    /// and left out.
    pub fn from_fields(fields: &RawFields, errors: &mut FieldErrors) -> Self {
        CreateTaskRequest {
            title: string_field(fields, "title", errors),
            description: string_field(fields, "description", errors),
            building_id: integer_field(fields, "building_id", errors),
            assigned_to: integer_field(fields, "assigned_to", errors),
            created_by: integer_field(fields, "created_by", errors),
        }
        .normalized()
    }

    /// Trims string fields; blank strings count as missing.
    pub fn normalized(mut self) -> Self {
        self.title = non_blank(self.title);
        self.description = non_blank(self.description);
        self
    }
}

/// Raw query string of the building task listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Only tasks assigned to this user id.
    pub assigned_to: Option<String>,
    /// Only tasks in this status (`Open`, `In Progress`, `Completed`, `Rejected`).
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub assigned_to: Option<i64>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.assigned_to.map_or(true, |id| task.assigned_to == Some(id))
            && self.status.map_or(true, |status| task.status == status)
    }
}

impl TaskListQuery {
    /// Parses the filters, recording a field error for each unusable value.
    pub fn into_filter(self, errors: &mut FieldErrors) -> TaskFilter {
        let mut filter = TaskFilter::default();

        if let Some(raw) = non_blank(self.assigned_to) {
            match parse_positive_id(&raw) {
                Some(id) => filter.assigned_to = Some(id),
                None => errors.add("assigned_to", "The assigned to field must be a positive integer."),
            }
        }

        if let Some(raw) = non_blank(self.status) {
            match raw.parse::<TaskStatus>() {
                Ok(status) => filter.status = Some(status),
                Err(_) => errors.add("status", "The selected status is invalid."),
            }
        }

        filter
    }
}
