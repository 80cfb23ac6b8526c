//! Resource Clients
//!
//! Typed bindings to backend endpoints, organized by resource. One function
//! per remote operation and no business logic.

mod auth;
mod projects;
mod tasks;

pub use auth::AuthApi;
pub use projects::ProjectApi;
pub use tasks::{ProjectTasks, TaskApi};

/// Sort order the list endpoints are asked for.
pub(crate) const DEFAULT_SORT: &str = "id";
