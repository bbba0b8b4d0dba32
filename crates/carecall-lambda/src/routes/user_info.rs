use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use carecall_audit::{AuditAction, AuditEvent};
use carecall_core::models::profile::{PatientProfile, ProfileUpdate};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const SAVED_MESSAGE: &str = "User information saved successfully";

const INVALID_JSON: &str = "Request body must be valid JSON";
const SAVE_FAILED: &str = "Failed to save user information";
const LOAD_FAILED: &str = "Failed to load user information";
const METHOD_NOT_ALLOWED: &str = "Method not allowed. Only GET and POST requests are supported.";

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: Option<PatientProfile>,
}

/// The caller's own profile, or `data: null` if none has been saved.
pub async fn get_user_info(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .db
        .get_profile(&user.sub)
        .await
        .map_err(|e| ApiError::internal(LOAD_FAILED, e))?;

    AuditEvent::new(
        AuditAction::ProfileLoaded,
        "user_information",
        user.sub.clone(),
        user.sub,
    )
    .with_details(json!({ "found": profile.is_some() }))
    .emit();

    Ok(Json(ProfileResponse {
        success: true,
        message: None,
        data: profile,
    }))
}

/// Create or replace the caller's profile.
///
/// Fields are trimmed and blanks stored as null. When no free-text
/// `information` is given it is summarised from the structured fields.
pub async fn save_user_info(
    user: AuthUser,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProfileResponse>, ApiError> {
    let value: Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest(INVALID_JSON.to_string()))?;
    let update = ProfileUpdate::from_value(&value)?;

    let profile = state
        .db
        .upsert_profile(&user.sub, update)
        .await
        .map_err(|e| ApiError::internal(SAVE_FAILED, e))?;

    info!(user_id = %profile.user_id, "user information saved");
    AuditEvent::new(
        AuditAction::ProfileSaved,
        "user_information",
        profile.user_id.clone(),
        user.sub,
    )
    .emit();

    Ok(Json(ProfileResponse {
        success: true,
        message: Some(SAVED_MESSAGE),
        data: Some(profile),
    }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed(METHOD_NOT_ALLOWED)
}
