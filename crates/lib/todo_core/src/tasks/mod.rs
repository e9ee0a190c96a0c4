//! Task operations scoped to their owner.
//!
//! Every read or write of a single task goes through [`guard::authorize`]
//! first, so a caller can never observe or touch another user's task.

pub mod guard;

use thiserror::Error;
use tracing::info;

use crate::models::{NewTask, Task, TaskChanges};
use crate::store::{StoreError, TaskStore};

pub use guard::authorize;

/// Longest accepted task title, after trimming.
pub const MAX_TITLE_LEN: usize = 255;

/// Longest accepted task description, after trimming.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Task errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Absent, or owned by someone else. Deliberately the same case.
    #[error("Task with ID {0} not found")]
    NotFound(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Trim a title and enforce its bounds.
pub fn validate_title(title: &str) -> Result<String, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::Validation("Title cannot be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskError::Validation(format!(
            "Title cannot exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

/// Trim a description and enforce its bounds.
pub fn validate_description(description: &str) -> Result<String, TaskError> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(TaskError::Validation(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(description.to_string())
}

impl NewTask {
    /// Build a task for `user_id`, normalizing and validating the input.
    pub fn validated(
        user_id: i64,
        title: &str,
        description: Option<&str>,
        due_date: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<Self, TaskError> {
        Ok(Self {
            user_id,
            title: validate_title(title)?,
            description: description.map(validate_description).transpose()?,
            due_date,
        })
    }
}

impl TaskChanges {
    /// Normalize and validate whichever fields are present.
    pub fn validated(self) -> Result<Self, TaskError> {
        Ok(Self {
            title: self.title.as_deref().map(validate_title).transpose()?,
            description: self
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            due_date: self.due_date,
        })
    }
}

pub async fn create_task(store: &dyn TaskStore, task: NewTask) -> Result<Task, TaskError> {
    let task = store.insert_task(task).await?;
    info!(task_id = task.id, user_id = task.user_id, "task created");
    Ok(task)
}

pub async fn list_tasks(
    store: &dyn TaskStore,
    owner_id: i64,
    completed: Option<bool>,
) -> Result<Vec<Task>, TaskError> {
    Ok(store.list_tasks(owner_id, completed).await?)
}

pub async fn get_task(
    store: &dyn TaskStore,
    owner_id: i64,
    task_id: i64,
) -> Result<Task, TaskError> {
    authorize(store, owner_id, task_id).await
}

pub async fn update_task(
    store: &dyn TaskStore,
    owner_id: i64,
    task_id: i64,
    changes: TaskChanges,
) -> Result<Task, TaskError> {
    let mut task = authorize(store, owner_id, task_id).await?;
    changes.validated()?.apply_to(&mut task);
    store
        .save_task(&task)
        .await?
        .ok_or(TaskError::NotFound(task_id))
}

pub async fn delete_task(
    store: &dyn TaskStore,
    owner_id: i64,
    task_id: i64,
) -> Result<(), TaskError> {
    authorize(store, owner_id, task_id).await?;
    if store.delete_task(task_id).await? {
        info!(task_id, user_id = owner_id, "task deleted");
        Ok(())
    } else {
        Err(TaskError::NotFound(task_id))
    }
}

/// Flip `completed` on an owned task.
pub async fn toggle_completion(
    store: &dyn TaskStore,
    owner_id: i64,
    task_id: i64,
) -> Result<Task, TaskError> {
    let mut task = authorize(store, owner_id, task_id).await?;
    let was_completed = task.completed;
    task.completed = !was_completed;
    task.updated_at = chrono::Utc::now();
    let task = store
        .save_task(&task)
        .await?
        .ok_or(TaskError::NotFound(task_id))?;
    info!(
        task_id,
        user_id = owner_id,
        from = was_completed,
        to = task.completed,
        "task completion toggled"
    );
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::store::MemoryStore;

    /// Deletes each task as soon as it has been looked up, so the following
    /// write finds the row gone.
    struct VanishingStore(MemoryStore);

    #[async_trait]
    impl TaskStore for VanishingStore {
        async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
            self.0.insert_task(task).await
        }

        async fn list_tasks(
            &self,
            user_id: i64,
            completed: Option<bool>,
        ) -> Result<Vec<Task>, StoreError> {
            self.0.list_tasks(user_id, completed).await
        }

        async fn find_task(&self, task_id: i64) -> Result<Option<Task>, StoreError> {
            let found = self.0.find_task(task_id).await?;
            self.0.delete_task(task_id).await?;
            Ok(found)
        }

        async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
            self.0.save_task(task).await
        }

        async fn delete_task(&self, task_id: i64) -> Result<bool, StoreError> {
            self.0.delete_task(task_id).await
        }
    }

    #[test]
    fn title_is_trimmed_and_bounded() {
        assert_eq!(validate_title("  Buy milk ").unwrap(), "Buy milk");
        assert!(matches!(validate_title("   "), Err(TaskError::Validation(_))));
        assert!(validate_title(&"x".repeat(255)).is_ok());
        assert!(validate_title(&"x".repeat(256)).is_err());
    }

    #[test]
    fn description_is_trimmed_and_bounded() {
        assert_eq!(validate_description(" notes ").unwrap(), "notes");
        assert_eq!(validate_description("").unwrap(), "");
        assert!(validate_description(&"d".repeat(1001)).is_err());
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let store = MemoryStore::new();
        let task = create_task(
            &store,
            NewTask::validated(1, "Original", Some("desc"), None).unwrap(),
        )
        .await
        .unwrap();

        let changes = TaskChanges {
            title: Some("  Renamed ".into()),
            ..Default::default()
        };
        let updated = update_task(&store, 1, task.id, changes).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description.as_deref(), Some("desc"));
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn update_rejects_blank_title_without_writing() {
        let store = MemoryStore::new();
        let task = create_task(&store, NewTask::validated(1, "Keep", None, None).unwrap())
            .await
            .unwrap();

        let changes = TaskChanges {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(
            update_task(&store, 1, task.id, changes).await,
            Err(TaskError::Validation(_))
        ));
        assert_eq!(get_task(&store, 1, task.id).await.unwrap().title, "Keep");
    }

    #[tokio::test]
    async fn toggle_flips_back_and_forth() {
        let store = MemoryStore::new();
        let task = create_task(&store, NewTask::validated(1, "T", None, None).unwrap())
            .await
            .unwrap();

        assert!(toggle_completion(&store, 1, task.id).await.unwrap().completed);
        assert!(!toggle_completion(&store, 1, task.id).await.unwrap().completed);
    }

    #[tokio::test]
    async fn foreign_mutations_leave_task_untouched() {
        let store = MemoryStore::new();
        let task = create_task(&store, NewTask::validated(1, "Mine", None, None).unwrap())
            .await
            .unwrap();

        assert!(matches!(
            toggle_completion(&store, 2, task.id).await,
            Err(TaskError::NotFound(id)) if id == task.id
        ));
        assert!(matches!(
            delete_task(&store, 2, task.id).await,
            Err(TaskError::NotFound(_))
        ));
        let changes = TaskChanges {
            title: Some("Stolen".into()),
            ..Default::default()
        };
        assert!(matches!(
            update_task(&store, 2, task.id, changes).await,
            Err(TaskError::NotFound(_))
        ));

        assert_eq!(get_task(&store, 1, task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn delete_removes_owned_task() {
        let store = MemoryStore::new();
        let task = create_task(&store, NewTask::validated(1, "Gone", None, None).unwrap())
            .await
            .unwrap();

        delete_task(&store, 1, task.id).await.unwrap();
        assert!(matches!(
            get_task(&store, 1, task.id).await,
            Err(TaskError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn writes_racing_a_delete_report_not_found() {
        let store = VanishingStore(MemoryStore::new());
        let task = create_task(&store, NewTask::validated(1, "Racy", None, None).unwrap())
            .await
            .unwrap();
        assert!(matches!(
            toggle_completion(&store, 1, task.id).await,
            Err(TaskError::NotFound(id)) if id == task.id
        ));

        let task = create_task(&store, NewTask::validated(1, "Racy", None, None).unwrap())
            .await
            .unwrap();
        let changes = TaskChanges {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        assert!(matches!(
            update_task(&store, 1, task.id, changes).await,
            Err(TaskError::NotFound(id)) if id == task.id
        ));
    }
}
