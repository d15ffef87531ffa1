use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::DatabaseStats;
use crate::models::building::{Building, NewBuilding};
use crate::models::comment::{Comment, NewComment};
use crate::models::task::{NewTask, Task, TaskFilter, TaskWithComments};
use crate::models::user::{NewUser, User};
use crate::repository::{Repository, RepositoryResult};
use crate::utils::errors::ServiceError;

/// Thread-safe in-memory store with the same foreign-key rules as the schema.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<InMemoryState>>,
}

// Rows are only ever appended, so vectors stay ordered by id.
#[derive(Debug, Default)]
struct InMemoryState {
    users: Vec<User>,
    buildings: Vec<Building>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

fn foreign_key_violation(column: &str, id: i64) -> ServiceError {
    ServiceError::DatabaseError(format!("foreign key violation: {} {} does not exist", column, id))
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn stats(&self) -> RepositoryResult<DatabaseStats> {
        let state = self.state.read().await;
        Ok(DatabaseStats {
            users: state.users.len() as i64,
            buildings: state.buildings.len() as i64,
            tasks: state.tasks.len() as i64,
            comments: state.comments.len() as i64,
        })
    }

    async fn building_exists(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.state.read().await.buildings.iter().any(|b| b.id == id))
    }

    async fn task_exists(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.state.read().await.tasks.iter().any(|t| t.id == id))
    }

    async fn user_exists(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.state.read().await.users.iter().any(|u| u.id == id))
    }

    async fn list_building_tasks(
        &self,
        building_id: i64,
        filter: &TaskFilter,
    ) -> RepositoryResult<Vec<TaskWithComments>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.building_id == building_id && filter.matches(task))
            .map(|task| TaskWithComments {
                task: task.clone(),
                comments: state
                    .comments
                    .iter()
                    .filter(|comment| comment.task_id == task.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn create_task(&self, task: NewTask) -> RepositoryResult<Task> {
        let mut state = self.state.write().await;

        if !state.buildings.iter().any(|b| b.id == task.building_id) {
            return Err(foreign_key_violation("building_id", task.building_id));
        }
        for user_id in task.assigned_to.into_iter().chain([task.created_by]) {
            if !state.users.iter().any(|u| u.id == user_id) {
                return Err(foreign_key_violation("user_id", user_id));
            }
        }

        let now = Utc::now();
        let task = Task {
            id: next_id(state.tasks.len()),
            title: task.title,
            description: task.description,
            status: task.status,
            building_id: task.building_id,
            assigned_to: task.assigned_to,
            created_by: task.created_by,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn create_comment(&self, comment: NewComment) -> RepositoryResult<Comment> {
        let mut state = self.state.write().await;

        if !state.tasks.iter().any(|t| t.id == comment.task_id) {
            return Err(foreign_key_violation("task_id", comment.task_id));
        }
        if !state.users.iter().any(|u| u.id == comment.user_id) {
            return Err(foreign_key_violation("user_id", comment.user_id));
        }

        let now = Utc::now();
        let comment = Comment {
            id: next_id(state.comments.len()),
            task_id: comment.task_id,
            user_id: comment.user_id,
            comment: comment.comment,
            created_at: now,
            updated_at: now,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn create_building(&self, building: NewBuilding) -> RepositoryResult<Building> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let building = Building {
            id: next_id(state.buildings.len()),
            name: building.name,
            address: building.address,
            created_at: now,
            updated_at: now,
        };
        state.buildings.push(building.clone());
        Ok(building)
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let user = User {
            id: next_id(state.users.len()),
            name: user.name,
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }
}
