// API Server for the role synchronisation service
// Exposes POST /update_roles over the rolesync-core reconciler

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServiceConfig;
pub use error::{ApiError, Result};
pub use server::Server;
pub use state::AppState;

/// Path of the role update endpoint
pub const UPDATE_ROLES_PATH: &str = "/update_roles";
