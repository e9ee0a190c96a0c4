//! In-process store. Data lives as long as the value does.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{NewTask, NewUser, Task, User, UserWithPassword};

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, UserWithPassword>,
    tasks: BTreeMap<i64, Task>,
    next_user_id: i64,
    next_task_id: i64,
}

impl Inner {
    fn allocate_user_id(&mut self) -> i64 {
        self.next_user_id += 1;
        self.next_user_id
    }

    fn allocate_task_id(&mut self) -> i64 {
        self.next_task_id += 1;
        self.next_task_id
    }
}

/// `RwLock`-guarded maps with sequential ids starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a user's `is_active` flag. Returns `false` for unknown users.
    pub async fn set_user_active(&self, user_id: i64, active: bool) -> bool {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user_id) {
            Some(record) => {
                record.user.is_active = active;
                record.user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.user.email == new.email) {
            return Err(StoreError::Conflict(format!(
                "email '{}' already registered",
                new.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: inner.allocate_user_id(),
            email: new.email,
            name: new.name,
            first_name: new.first_name,
            last_name: new.last_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(
            user.id,
            UserWithPassword {
                user: user.clone(),
                hashed_password: new.password_hash.into_inner(),
            },
        );
        Ok(user)
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.user.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&user_id).map(|u| u.user.clone()))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, new: NewTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let task = Task {
            id: inner.allocate_task_id(),
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            completed: false,
            created_at: now,
            updated_at: now,
            due_date: new.due_date,
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list_tasks(
        &self,
        user_id: i64,
        completed: Option<bool>,
    ) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .filter(|t| completed.is_none_or(|c| t.completed == c))
            .cloned()
            .collect())
    }

    async fn find_task(&self, task_id: i64) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.get(&task_id).cloned())
    }

    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.get_mut(&task.id).map(|stored| {
            *stored = task.clone();
            stored.clone()
        }))
    }

    async fn delete_task(&self, task_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.remove(&task_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::CredentialHash;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            name: None,
            first_name: None,
            last_name: None,
            password_hash: CredentialHash::from_stored("$2b$10$placeholder"),
        }
    }

    fn new_task(user_id: i64, title: &str) -> NewTask {
        NewTask {
            user_id,
            title: title.into(),
            description: None,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn users_get_sequential_ids_and_unique_emails() {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("a@x.io")).await.unwrap();
        let b = store.create_user(new_user("b@x.io")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(a.is_active);

        let dup = store.create_user(new_user("a@x.io")).await;
        assert!(matches!(dup, Err(StoreError::Conflict(_))));

        let found = store.find_user_by_email("b@x.io").await.unwrap().unwrap();
        assert_eq!(found.user, b);
        assert!(store.find_user_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner_and_filterable() {
        let store = MemoryStore::new();
        let t1 = store.insert_task(new_task(1, "one")).await.unwrap();
        store.insert_task(new_task(2, "theirs")).await.unwrap();
        let mut t3 = store.insert_task(new_task(1, "three")).await.unwrap();

        t3.completed = true;
        store.save_task(&t3).await.unwrap();

        let all = store.list_tasks(1, None).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t1.id, t3.id]);

        let done = store.list_tasks(1, Some(true)).await.unwrap();
        assert_eq!(done, vec![t3]);

        let open = store.list_tasks(1, Some(false)).await.unwrap();
        assert_eq!(open, vec![t1]);
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let store = MemoryStore::new();
        let t = store.insert_task(new_task(1, "x")).await.unwrap();
        assert!(store.delete_task(t.id).await.unwrap());
        assert!(!store.delete_task(t.id).await.unwrap());
        assert!(store.find_task(t.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saving_a_deleted_task_yields_none() {
        let store = MemoryStore::new();
        let task = store.insert_task(new_task(1, "brief")).await.unwrap();
        assert!(store.delete_task(task.id).await.unwrap());

        assert!(store.save_task(&task).await.unwrap().is_none());
        assert!(store.find_task(task.id).await.unwrap().is_none());
    }
}
