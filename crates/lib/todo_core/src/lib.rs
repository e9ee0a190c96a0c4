//! # todo_core
//!
//! Core domain logic for the todo backend: credential hashing, JWT handling,
//! rate limiting, owner-scoped task operations and storage seams. Also hosts
//! the single-user list behind the console tool.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod ratelimit;
pub mod store;
pub mod tasks;
pub mod todo_list;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
