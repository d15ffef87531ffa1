use actix_web::{web, HttpRequest, HttpResponse, Result};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use validator::Validate;

use crate::config::AppConfig;
use crate::handlers::decode_body;
use crate::models::response::{DataResponse, ErrorResponse, ValidationErrorResponse};
use crate::models::task::{CreateTaskRequest, NewTask, Task, TaskListQuery, TaskStatus, TaskWithComments};
use crate::repository::Repository;
use crate::utils::auth::{resolve_actor, Actor};
use crate::utils::errors::ServiceError;
use crate::utils::validation::{parse_positive_id, FieldErrors};

/// Picks the task author: the authenticated actor, else the caller-supplied
/// id, else the configured placeholder.
pub fn resolve_created_by(actor: Option<Actor>, supplied: Option<i64>, fallback: Option<i64>) -> Option<i64> {
    actor.map(|actor| actor.user_id).or(supplied).or(fallback)
}

/// List tasks of a building, comments included
#[utoipa::path(
    get,
    path = "/api/buildings/{building_id}/tasks",
    tag = "tasks",
    params(
        ("building_id" = i64, Path, description = "Building ID"),
        TaskListQuery
    ),
    responses(
        (status = 200, description = "Tasks retrieved successfully", body = DataResponse<Vec<TaskWithComments>>),
        (status = 422, description = "Invalid building or filter", body = ValidationErrorResponse)
    )
)]
pub async fn list_tasks(
    repo: web::Data<dyn Repository>,
    path: web::Path<String>,
    query: web::Query<TaskListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let raw_building_id = path.into_inner();
    log::info!("GET /api/buildings/{}/tasks", raw_building_id);

    let mut errors = FieldErrors::new();
    let filter = query.into_inner().into_filter(&mut errors);

    let building_id = parse_positive_id(&raw_building_id);
    match building_id {
        Some(id) => {
            if !repo.building_exists(id).await? {
                errors.add("building_id", "The selected building id is invalid.");
            }
        }
        None => errors.add("building_id", "The building id field must be a positive integer."),
    }
    errors.into_result()?;

    let Some(building_id) = building_id else {
        return Err(ServiceError::InternalError("building id missing after validation".to_string()));
    };

    let tasks = repo.list_building_tasks(building_id, &filter).await?;

    log::info!("Retrieved {} tasks for building {}", tasks.len(), building_id);
    Ok(HttpResponse::Ok().json(DataResponse::new(tasks)))
}

/// Create a new task
///
/// The task always starts in the `Open` status.
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    security(
        (),
        ("bearer_auth" = [])
    ),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = DataResponse<Task>),
        (status = 401, description = "Invalid bearer token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ValidationErrorResponse)
    )
)]
pub async fn create_task(
    repo: web::Data<dyn Repository>,
    config: web::Data<AppConfig>,
    bearer: Option<BearerAuth>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let actor = resolve_actor(bearer.as_ref(), &config)?;

    let mut errors = FieldErrors::new();
    let task_req = CreateTaskRequest::from_fields(&decode_body(&req, &body)?, &mut errors);
    log::info!("POST /api/tasks - Creating new task: {:?}", task_req.title);

    errors.merge_unreported(FieldErrors::from_result(task_req.validate()));

    if let Some(building_id) = task_req.building_id.filter(|_| !errors.has("building_id")) {
        if !repo.building_exists(building_id).await? {
            errors.add("building_id", "The selected building id is invalid.");
        }
    }

    if let Some(assigned_to) = task_req.assigned_to.filter(|_| !errors.has("assigned_to")) {
        if !repo.user_exists(assigned_to).await? {
            errors.add("assigned_to", "The selected assigned to is invalid.");
        }
    }

    let created_by = resolve_created_by(actor, task_req.created_by, config.default_created_by);
    match created_by {
        _ if errors.has("created_by") => {}
        None => errors.add("created_by", "The created by field is required."),
        Some(user_id) => {
            if !repo.user_exists(user_id).await? {
                errors.add("created_by", "The selected created by is invalid.");
            }
        }
    }

    errors.into_result()?;

    let (Some(title), Some(description), Some(building_id), Some(created_by)) =
        (task_req.title, task_req.description, task_req.building_id, created_by)
    else {
        return Err(ServiceError::InternalError("task payload incomplete after validation".to_string()));
    };

    let task = repo
        .create_task(NewTask {
            title,
            description,
            status: TaskStatus::Open,
            building_id,
            assigned_to: task_req.assigned_to,
            created_by,
        })
        .await?;

    log::info!("Task created successfully with ID: {}", task.id);
    Ok(HttpResponse::Created().json(DataResponse::new(task)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/buildings/{building_id}/tasks", web::get().to(list_tasks))
        .route("/tasks", web::post().to(create_task));
}
