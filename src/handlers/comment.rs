use actix_web::{web, HttpRequest, HttpResponse, Result};
use validator::Validate;

use crate::handlers::decode_body;
use crate::models::comment::{Comment, CreateCommentRequest, NewComment};
use crate::models::response::{DataResponse, ValidationErrorResponse};
use crate::repository::Repository;
use crate::utils::errors::ServiceError;
use crate::utils::validation::FieldErrors;

/// Create a comment on a task
#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created successfully", body = DataResponse<Comment>),
        (status = 422, description = "Validation error", body = ValidationErrorResponse)
    )
)]
pub async fn create_comment(
    repo: web::Data<dyn Repository>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let mut errors = FieldErrors::new();
    let comment_req = CreateCommentRequest::from_fields(&decode_body(&req, &body)?, &mut errors);
    log::info!("POST /api/comments - Commenting on task: {:?}", comment_req.task_id);

    errors.merge_unreported(FieldErrors::from_result(comment_req.validate()));

    if let Some(task_id) = comment_req.task_id.filter(|_| !errors.has("task_id")) {
        if !repo.task_exists(task_id).await? {
            errors.add("task_id", "The selected task id is invalid.");
        }
    }

    if let Some(user_id) = comment_req.user_id.filter(|_| !errors.has("user_id")) {
        if !repo.user_exists(user_id).await? {
            errors.add("user_id", "The selected user id is invalid.");
        }
    }

    errors.into_result()?;

    let (Some(task_id), Some(user_id), Some(comment)) =
        (comment_req.task_id, comment_req.user_id, comment_req.comment)
    else {
        return Err(ServiceError::InternalError("comment payload incomplete after validation".to_string()));
    };

    let comment = repo
        .create_comment(NewComment {
            task_id,
            user_id,
            comment,
        })
        .await?;

    log::info!("Comment created successfully with ID: {}", comment.id);
    Ok(HttpResponse::Created().json(DataResponse::new(comment)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/comments", web::post().to(create_comment));
}
