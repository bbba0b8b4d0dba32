use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from a validated session token.
///
/// Taking `AuthUser` as a handler argument makes the route require a valid
/// `Authorization: Bearer <token>` header; anything else is a 401.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let claims = state.tokens.validate_header(header).map_err(|e| {
            debug!(error = %e, path = %parts.uri.path(), "rejected session token");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser { sub: claims.sub })
    }
}
