use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rolesync_core::FieldError;

use crate::models::{ErrorEntry, ErrorResponse};

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Role sync error: {0}")]
    RoleSync(#[from] rolesync_core::RoleSyncError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                errors.into_iter().map(ErrorEntry::from).collect(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, vec![ErrorEntry::body(msg)]),
            ApiError::RoleSync(e) => {
                tracing::error!(error = %e, "role reconciliation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![ErrorEntry::body(e.to_string())],
                )
            }
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolesync_core::{validation::validate, RoleMapping, RoleSyncError};
    use serde_json::json;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let errors = validate(&json!({ "userId": "u1" }), &RoleMapping::default());
        let response = ApiError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_role_sync_maps_to_internal_error() {
        let response = ApiError::from(RoleSyncError::store("lock poisoned")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Expected request with `Content-Type: application/json`".into());
        assert!(err.to_string().starts_with("Bad request"));

        let errors = validate(&json!({}), &RoleMapping::default());
        assert_eq!(
            ApiError::Validation(errors).to_string(),
            "Validation failed with 2 error(s)"
        );
    }
}
