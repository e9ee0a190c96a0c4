//! Request middleware: rate limiting, request logging and bearer auth.

pub mod auth;
pub mod logging;
pub mod rate_limit;
