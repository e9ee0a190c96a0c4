//! Request handlers.

pub mod auth;
pub mod root;
pub mod tasks;
