//! Resolves the caller's profile from a bearer access token.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::models::{Profile, Role};
use crate::state::AppState;
use crate::utils::AppError;

/// The signed-in caller. Rejects with 401 when the token is missing or
/// invalid, or when no profile exists for the user.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

impl CurrentProfile {
    /// 403 unless the caller holds one of `roles`.
    pub fn require(self, roles: &[Role]) -> Result<Profile, AppError> {
        if roles.contains(&self.0.role) {
            Ok(self.0)
        } else {
            Err(AppError::Forbidden(
                "You do not have access to this resource".to_string(),
            ))
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentProfile {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

        let user_id = state.auth.user_from_access_token(token).await?;

        let profile = state
            .store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::AuthError("No profile for this account".to_string()))?;

        Ok(CurrentProfile(profile))
    }
}
