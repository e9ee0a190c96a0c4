//! Ownership guard for single-task access.

use tracing::debug;

use super::TaskError;
use crate::models::Task;
use crate::store::TaskStore;

/// Load `task_id` on behalf of `owner_id`.
///
/// A task owned by someone else yields the same [`TaskError::NotFound`] as a
/// missing one, so callers cannot probe for other users' ids.
pub async fn authorize(
    store: &dyn TaskStore,
    owner_id: i64,
    task_id: i64,
) -> Result<Task, TaskError> {
    match store.find_task(task_id).await? {
        Some(task) if task.user_id == owner_id => Ok(task),
        Some(_) => {
            debug!(task_id, owner_id, "task owned by another user");
            Err(TaskError::NotFound(task_id))
        }
        None => Err(TaskError::NotFound(task_id)),
    }
}
