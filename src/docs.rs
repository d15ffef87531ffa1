use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{comment, health, task};
use crate::models::{building, comment as comment_model, response, task as task_model, user};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Maintenance Backend API",
        description = "Buildings, their maintenance tasks and task comments"
    ),
    paths(
        task::list_tasks,
        task::create_task,
        comment::create_comment,
        health::health_check,
    ),
    components(schemas(
        building::Building,
        user::User,
        task_model::Task,
        task_model::TaskStatus,
        task_model::TaskWithComments,
        task_model::CreateTaskRequest,
        comment_model::Comment,
        comment_model::CreateCommentRequest,
        response::ErrorResponse,
        response::ValidationErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "tasks", description = "Building maintenance tasks"),
        (name = "comments", description = "Notes left on tasks"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/buildings/{building_id}/tasks"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/tasks"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/comments"));
    }

    #[test]
    fn document_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
