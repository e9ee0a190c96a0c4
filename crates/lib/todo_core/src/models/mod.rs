//! Domain models shared by the stores and the API layer.

pub mod auth;
pub mod task;

pub use auth::{NewUser, User, UserWithPassword};
pub use task::{NewTask, Task, TaskChanges};
