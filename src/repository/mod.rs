//! Persistence port for buildings, tasks and comments.
//!
//! Handlers only talk to [`Repository`]; [`PgRepository`] is the production
//! adapter and [`InMemoryRepository`] backs the HTTP tests and `STORAGE=memory`.

mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

use async_trait::async_trait;

use crate::database::DatabaseStats;
use crate::models::building::{Building, NewBuilding};
use crate::models::comment::{Comment, NewComment};
use crate::models::task::{NewTask, Task, TaskFilter, TaskWithComments};
use crate::models::user::{NewUser, User};
use crate::utils::errors::ServiceError;

pub type RepositoryResult<T> = Result<T, ServiceError>;

#[async_trait]
pub trait Repository: Send + Sync {
    /// Confirms the backing store answers queries.
    async fn ping(&self) -> RepositoryResult<()>;

    async fn stats(&self) -> RepositoryResult<DatabaseStats>;

    async fn building_exists(&self, id: i64) -> RepositoryResult<bool>;

    async fn task_exists(&self, id: i64) -> RepositoryResult<bool>;

    async fn user_exists(&self, id: i64) -> RepositoryResult<bool>;

    /// Tasks of one building ordered by id, each with its comments ordered by id.
    async fn list_building_tasks(
        &self,
        building_id: i64,
        filter: &TaskFilter,
    ) -> RepositoryResult<Vec<TaskWithComments>>;

    async fn create_task(&self, task: NewTask) -> RepositoryResult<Task>;

    async fn create_comment(&self, comment: NewComment) -> RepositoryResult<Comment>;

    async fn create_building(&self, building: NewBuilding) -> RepositoryResult<Building>;

    /// Users are owned elsewhere; this exists for seeding and fixtures.
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User>;
}
