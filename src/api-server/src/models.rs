use rolesync_core::{FieldError, RoleDiff};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Role update request
///
/// Documentation shape only: the handler validates the raw JSON so that
/// type mismatches surface as field errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolesRequest {
    /// User identifier (1-20 characters)
    #[schema(example = "257684345692")]
    pub user_id: String,

    /// Azure AD role names (at most 10); the complete desired role list
    #[schema(example = json!(["001 - Admin", "003 - Warehouse Personnel"]))]
    pub roles: Vec<String>,
}

/// Role update response, in internal role codes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateRolesResponse {
    /// Roles the user did not have before
    pub added_roles: Vec<String>,

    /// Roles removed from the user
    pub deleted_roles: Vec<String>,

    /// Roles the user already had
    pub unchanged_roles: Vec<String>,
}

impl From<RoleDiff> for UpdateRolesResponse {
    fn from(diff: RoleDiff) -> Self {
        Self {
            added_roles: diff.added,
            deleted_roles: diff.deleted,
            unchanged_roles: diff.unchanged,
        }
    }
}

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEntry {
    /// `field` for a failed field rule, `body` for an unreadable body
    #[serde(rename = "type")]
    pub error_type: String,

    /// Offending value, omitted when the field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub value: Option<Value>,

    /// Human readable message
    pub msg: String,

    /// Offending field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Where the problem was found
    pub location: String,
}

impl ErrorEntry {
    /// Entry for a request body that could not be read as JSON
    pub fn body(msg: impl Into<String>) -> Self {
        Self {
            error_type: "body".to_string(),
            value: None,
            msg: msg.into(),
            path: None,
            location: "body".to_string(),
        }
    }
}

impl From<FieldError> for ErrorEntry {
    fn from(err: FieldError) -> Self {
        Self {
            error_type: "field".to_string(),
            value: err.value,
            msg: err.msg.to_string(),
            path: Some(err.path.to_string()),
            location: "body".to_string(),
        }
    }
}

/// Error response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorEntry>,
}
