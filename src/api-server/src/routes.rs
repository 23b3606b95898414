//! Route definitions for the API server

use crate::{handlers, middleware, state::AppState, UPDATE_ROLES_PATH};
use axum::{middleware as axum_middleware, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Role Sync API",
        description = "Reconciles Azure AD role names against internally tracked role codes",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    paths(
        handlers::update_roles,
    ),
    components(
        schemas(
            crate::models::UpdateRolesRequest,
            crate::models::UpdateRolesResponse,
            crate::models::ErrorEntry,
            crate::models::ErrorResponse,
        )
    ),
    tags(
        (name = "roles", description = "Role synchronisation"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    )
)]
pub struct ApiDoc;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(UPDATE_ROLES_PATH, post(handlers::update_roles))
        .with_state(state)
        // executed bottom to top
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
