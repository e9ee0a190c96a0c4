//! PostgreSQL-backed store.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{NewTask, NewUser, Task, User, UserWithPassword};

const USER_COLUMNS: &str =
    "id, email, name, first_name, last_name, is_active, created_at, updated_at";

const TASK_COLUMNS: &str =
    "id, user_id, title, description, completed, created_at, updated_at, due_date";

/// Store over a shared `PgPool`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, first_name, last_name, hashed_password) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.password_hash.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                StoreError::Conflict(format!("email '{}' already registered", new.email)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        let row = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {USER_COLUMNS}, hashed_password FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, new: NewTask) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (user_id, title, description, due_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list_tasks(
        &self,
        user_id: i64,
        completed: Option<bool>,
    ) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE user_id = $1 AND ($2::boolean IS NULL OR completed = $2) \
             ORDER BY id ASC"
        ))
        .bind(user_id)
        .bind(completed)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_task(&self, task_id: i64) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET title = $1, description = $2, completed = $3, due_date = $4, updated_at = $5 \
             WHERE id = $6 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.due_date)
        .bind(task.updated_at)
        .bind(task.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_task(&self, task_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
