//! `PgRepository` against a real PostgreSQL server.
//!
//! Ignored by default. Run with a disposable database:
//! `DATABASE_URL=postgres://... cargo test --test postgres_repository -- --ignored`

use maintenance_be::models::building::{Building, NewBuilding};
use maintenance_be::models::comment::NewComment;
use maintenance_be::models::task::{NewTask, Task, TaskFilter, TaskStatus};
use maintenance_be::models::user::{NewUser, User};
use maintenance_be::repository::{PgRepository, Repository};
use maintenance_be::Database;
use tokio::sync::Mutex;

// Concurrent `CREATE TYPE`/`CREATE TABLE IF NOT EXISTS` can still collide
static SCHEMA_LOCK: Mutex<()> = Mutex::const_new(());

async fn database() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let db = Database::connect(&url, 2).await.unwrap();

    let _guard = SCHEMA_LOCK.lock().await;
    sqlx::raw_sql(include_str!("../schema.sql"))
        .execute(&db.pool)
        .await
        .unwrap();
    db
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn user(repo: &PgRepository) -> User {
    let email = format!("{}@example.com", unique("tech"));
    repo.create_user(NewUser {
        name: "Tech Tester".to_string(),
        email,
    })
    .await
    .unwrap()
}

async fn building(repo: &PgRepository) -> Building {
    repo.create_building(NewBuilding {
        name: unique("Building"),
        address: "1 Test Road".to_string(),
    })
    .await
    .unwrap()
}

async fn task(repo: &PgRepository, building: &Building, author: &User, assignee: Option<&User>, status: TaskStatus) -> Task {
    repo.create_task(NewTask {
        title: format!("{} job", status),
        description: "Created by the Postgres suite".to_string(),
        status,
        building_id: building.id,
        assigned_to: assignee.map(|user| user.id),
        created_by: author.id,
    })
    .await
    .unwrap()
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn schema_is_complete_after_applying_schema_sql() {
    let db = database().await;

    db.ping().await.unwrap();
    assert!(db.missing_tables().await.unwrap().is_empty());
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn listing_filters_in_sql_and_attaches_comments() {
    let repo = PgRepository::new(database().await);
    let author = user(&repo).await;
    let worker = user(&repo).await;
    let site = building(&repo).await;
    let other_site = building(&repo).await;

    let in_progress = task(&repo, &site, &author, Some(&worker), TaskStatus::InProgress).await;
    task(&repo, &site, &author, Some(&worker), TaskStatus::Open).await;
    task(&repo, &site, &author, None, TaskStatus::InProgress).await;
    task(&repo, &other_site, &author, Some(&worker), TaskStatus::InProgress).await;

    repo.create_comment(NewComment {
        task_id: in_progress.id,
        user_id: worker.id,
        comment: "Halfway there".to_string(),
    })
    .await
    .unwrap();

    let all = repo.list_building_tasks(site.id, &TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let filter = TaskFilter {
        assigned_to: Some(worker.id),
        status: Some(TaskStatus::InProgress),
    };
    let matching = repo.list_building_tasks(site.id, &filter).await.unwrap();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].task.id, in_progress.id);
    assert_eq!(matching[0].task.status, TaskStatus::InProgress);
    assert_eq!(matching[0].comments.len(), 1);
    assert_eq!(matching[0].comments[0].comment, "Halfway there");
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn existence_checks_see_inserted_rows() {
    let repo = PgRepository::new(database().await);
    let author = user(&repo).await;
    let site = building(&repo).await;
    let job = task(&repo, &site, &author, None, TaskStatus::Rejected).await;

    assert!(repo.user_exists(author.id).await.unwrap());
    assert!(repo.building_exists(site.id).await.unwrap());
    assert!(repo.task_exists(job.id).await.unwrap());
    assert!(!repo.task_exists(i64::MAX).await.unwrap());
    assert_eq!(job.status, TaskStatus::Rejected);
    assert!(repo.stats().await.unwrap().tasks >= 1);
}
