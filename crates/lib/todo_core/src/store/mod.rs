//! Persistence seams for users and tasks.
//!
//! The core only talks to storage through these traits. `PgStore` backs the
//! server; `MemoryStore` backs tests and `--in-memory` runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTask, NewUser, Task, User, UserWithPassword};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// User lookups and registration.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::Conflict`] on a taken email.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str)
    -> Result<Option<UserWithPassword>, StoreError>;

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError>;
}

/// Task persistence. Owner checks live in [`crate::tasks::guard`], not here.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Tasks owned by `user_id`, oldest first, optionally filtered.
    async fn list_tasks(
        &self,
        user_id: i64,
        completed: Option<bool>,
    ) -> Result<Vec<Task>, StoreError>;

    async fn find_task(&self, task_id: i64) -> Result<Option<Task>, StoreError>;

    /// Persist the mutable fields of an existing task and return the stored row.
    ///
    /// `None` if the task no longer exists.
    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError>;

    /// Returns `false` if the task was already gone.
    async fn delete_task(&self, task_id: i64) -> Result<bool, StoreError>;
}

/// Everything the API needs from storage.
pub trait Store: UserStore + TaskStore {}

impl<T: UserStore + TaskStore> Store for T {}
