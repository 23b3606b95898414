use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use rolesync_core::validation::validate_update;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{
    error::{ApiError, Result},
    models::*,
    state::AppState,
};

/// Whether the request declares a JSON body (`application/json` or `*+json`)
fn is_json_content(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Read the request body as JSON.
///
/// A body that is not declared as JSON, or is empty, reads as `{}` so the
/// field rules report what is missing. Only a declared JSON body that fails to
/// parse is rejected here.
pub fn read_payload(headers: &HeaderMap, body: &[u8]) -> Result<Value> {
    if !is_json_content(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    let Json(payload) =
        Json::<Value>::from_bytes(body).map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(payload)
}

/// Replace a user's role list and report the difference
///
/// The request's `roles` is the complete desired list of Azure AD role names.
/// Roles are translated to internal codes, compared with the roles stored for
/// the user, and the stored set is replaced.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3000/update_roles \
///   -H "Content-Type: application/json" \
///   -d '{"userId": "257684345692", "roles": ["001 - Admin"]}'
/// ```
#[utoipa::path(
    post,
    path = "/update_roles",
    request_body = UpdateRolesRequest,
    responses(
        (status = 200, description = "Roles reconciled", body = UpdateRolesResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn update_roles(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UpdateRolesResponse>> {
    let payload = read_payload(&headers, &body)?;

    let update = validate_update(&payload, state.mapping()).map_err(ApiError::Validation)?;
    debug!(user_id = %update.user_id, roles = update.roles.len(), "role update accepted");

    let diff = state
        .reconciler
        .reconcile(&update.user_id, &update.roles)
        .await?;

    Ok(Json(diff.into()))
}
