//! Shared fixtures for the HTTP tests: an in-memory store with two users and
//! two buildings, plus an app factory wired exactly like the server.

#![allow(dead_code)]

use jsonwebtoken::{encode, EncodingKey, Header};
use maintenance_be::config::{AppConfig, StorageBackend};
use maintenance_be::models::building::{Building, NewBuilding};
use maintenance_be::models::comment::{Comment, NewComment};
use maintenance_be::models::task::{NewTask, Task, TaskStatus};
use maintenance_be::models::user::{NewUser, User};
use maintenance_be::repository::{InMemoryRepository, Repository};
use maintenance_be::utils::auth::Claims;

pub const JWT_SECRET: &str = "test-secret";
pub const DOCS_URL: &str = "http://localhost:85/docs?api-docs.json";
pub const FALLBACK_MESSAGE: &str =
    "This route does not exist. Check documentation at http://localhost:85/docs?api-docs.json";

/// Builds the app service around a repository (shared, so the test can
/// inspect what the handlers wrote) and a configuration.
macro_rules! init_app {
    ($repo:expr, $config:expr) => {{
        let repo: std::sync::Arc<dyn maintenance_be::repository::Repository> =
            std::sync::Arc::new($repo.clone());
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(repo))
                .app_data(actix_web::web::Data::new($config))
                .configure(maintenance_be::handlers::configure)
                .default_service(actix_web::web::to(maintenance_be::handlers::fallback::not_found)),
        )
        .await
    }};
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        database_max_connections: 1,
        port: 85,
        environment: "test".to_string(),
        frontend_urls: vec!["http://localhost:3000".to_string()],
        jwt_secret: Some(JWT_SECRET.to_string()),
        default_created_by: Some(1),
        docs_url: DOCS_URL.to_string(),
        storage: StorageBackend::Memory,
    }
}

pub struct Fixture {
    pub repo: InMemoryRepository,
    pub building: Building,
    pub annex: Building,
    pub alice: User,
    pub bob: User,
}

pub async fn fixture() -> Fixture {
    let repo = InMemoryRepository::new();
    let alice = repo
        .create_user(NewUser {
            name: "Alice Okafor".to_string(),
            email: "alice@example.com".to_string(),
        })
        .await
        .unwrap();
    let bob = repo
        .create_user(NewUser {
            name: "Bob Rossi".to_string(),
            email: "bob@example.com".to_string(),
        })
        .await
        .unwrap();
    let building = repo
        .create_building(NewBuilding {
            name: "Building Northwind".to_string(),
            address: "12 Elm Street, Springfield".to_string(),
        })
        .await
        .unwrap();
    let annex = repo
        .create_building(NewBuilding {
            name: "Building Cedar Point".to_string(),
            address: "4 Mill Lane, Riverton".to_string(),
        })
        .await
        .unwrap();

    Fixture {
        repo,
        building,
        annex,
        alice,
        bob,
    }
}

pub async fn add_task(
    repo: &InMemoryRepository,
    building_id: i64,
    created_by: i64,
    assigned_to: Option<i64>,
    status: TaskStatus,
) -> Task {
    repo.create_task(NewTask {
        title: format!("{} task", status),
        description: "Seeded for a test".to_string(),
        status,
        building_id,
        assigned_to,
        created_by,
    })
    .await
    .unwrap()
}

pub async fn add_comment(repo: &InMemoryRepository, task_id: i64, user_id: i64, text: &str) -> Comment {
    repo.create_comment(NewComment {
        task_id,
        user_id,
        comment: text.to_string(),
    })
    .await
    .unwrap()
}

pub fn bearer_token(user_id: i64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_ref())).unwrap()
}
