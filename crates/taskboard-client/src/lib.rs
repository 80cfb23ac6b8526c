//! Taskboard Client Core
//!
//! Layered architecture:
//! - http / transport: request dispatch with session renewal
//! - api: one typed client per backend resource
//! - session, collection, entity: state owners driven by the view layer
//!
//! Nothing in this crate knows about the DOM; the UI crate plugs its
//! signals in through [`state::StateCell`] and its browser storage through
//! [`storage::IdentityStorage`].

pub mod api;
pub mod collection;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
pub mod transport;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpClient;
pub use state::{LocalState, StateCell};
