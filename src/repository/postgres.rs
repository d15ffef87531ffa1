use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use std::collections::HashMap;

use crate::database::{Database, DatabaseStats};
use crate::models::building::{Building, NewBuilding};
use crate::models::comment::{Comment, NewComment};
use crate::models::task::{NewTask, Task, TaskFilter, TaskWithComments};
use crate::models::user::{NewUser, User};
use crate::repository::{Repository, RepositoryResult};
use crate::utils::errors::ServiceError;

const TASK_COLUMNS: &str =
    "id, title, description, status, building_id, assigned_to, created_by, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, task_id, user_id, comment, created_at, updated_at";

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> ServiceError {
    move |e| {
        log::error!("Database error {}: {}", context, e);
        ServiceError::DatabaseError(format!("Failed to {}", context))
    }
}

pub struct PgRepository {
    db: Database,
}

impl PgRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn exists(&self, table: &'static str, id: i64) -> RepositoryResult<bool> {
        // `table` is always one of our own literals
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table);
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.db.pool)
            .await
            .map_err(db_error("check record existence"))
    }

    async fn comments_for(&self, task_ids: &[i64]) -> RepositoryResult<HashMap<i64, Vec<Comment>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE task_id = ANY($1) ORDER BY id",
            COMMENT_COLUMNS
        ))
        .bind(task_ids)
        .fetch_all(&self.db.pool)
        .await
        .map_err(db_error("fetch task comments"))?;

        let mut by_task: HashMap<i64, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_task.entry(comment.task_id).or_default().push(comment);
        }
        Ok(by_task)
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        self.db.ping().await.map_err(ServiceError::from)
    }

    async fn stats(&self) -> RepositoryResult<DatabaseStats> {
        self.db.stats().await.map_err(ServiceError::from)
    }

    async fn building_exists(&self, id: i64) -> RepositoryResult<bool> {
        self.exists("buildings", id).await
    }

    async fn task_exists(&self, id: i64) -> RepositoryResult<bool> {
        self.exists("tasks", id).await
    }

    async fn user_exists(&self, id: i64) -> RepositoryResult<bool> {
        self.exists("users", id).await
    }

    async fn list_building_tasks(
        &self,
        building_id: i64,
        filter: &TaskFilter,
    ) -> RepositoryResult<Vec<TaskWithComments>> {
        let mut query_builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM tasks WHERE building_id = ", TASK_COLUMNS));
        query_builder.push_bind(building_id);

        if let Some(assigned_to) = filter.assigned_to {
            query_builder.push(" AND assigned_to = ").push_bind(assigned_to);
        }
        if let Some(status) = filter.status {
            query_builder.push(" AND status = ").push_bind(status);
        }
        query_builder.push(" ORDER BY id");

        let tasks = query_builder
            .build_query_as::<Task>()
            .fetch_all(&self.db.pool)
            .await
            .map_err(db_error("fetch building tasks"))?;

        let task_ids: Vec<i64> = tasks.iter().map(|task| task.id).collect();
        let mut comments = self.comments_for(&task_ids).await?;

        Ok(tasks
            .into_iter()
            .map(|task| TaskWithComments {
                comments: comments.remove(&task.id).unwrap_or_default(),
                task,
            })
            .collect())
    }

    async fn create_task(&self, task: NewTask) -> RepositoryResult<Task> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, status, building_id, assigned_to, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.building_id)
        .bind(task.assigned_to)
        .bind(task.created_by)
        .fetch_one(&self.db.pool)
        .await
        .map_err(db_error("create task"))
    }

    async fn create_comment(&self, comment: NewComment) -> RepositoryResult<Comment> {
        sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (task_id, user_id, comment)
             VALUES ($1, $2, $3)
             RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(comment.task_id)
        .bind(comment.user_id)
        .bind(&comment.comment)
        .fetch_one(&self.db.pool)
        .await
        .map_err(db_error("create comment"))
    }

    async fn create_building(&self, building: NewBuilding) -> RepositoryResult<Building> {
        sqlx::query_as::<_, Building>(
            "INSERT INTO buildings (name, address)
             VALUES ($1, $2)
             RETURNING id, name, address, created_at, updated_at",
        )
        .bind(&building.name)
        .bind(&building.address)
        .fetch_one(&self.db.pool)
        .await
        .map_err(db_error("create building"))
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email)
             VALUES ($1, $2)
             RETURNING id, name, email, created_at, updated_at",
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.db.pool)
        .await
        .map_err(db_error("create user"))
    }
}
