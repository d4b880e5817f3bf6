//! Password reset by emailed link.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::spawn_email;
use crate::state::AppState;
use crate::tokens::{generate_reset_token, sha256_hex, RESET_TOKEN_TTL_MINUTES};
use crate::utils::validation::{check_password, normalize_email, required};
use crate::utils::{AppError, AppResult};

const FORGOT_MESSAGE: &str = "If an account exists for this email, a reset link has been sent.";

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub token: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PasswordResponse {
    pub success: bool,
    pub message: String,
}

/// `POST /api/auth/forgot-password`. The response is identical whether or
/// not the email belongs to an account, and the send runs in the background
/// so timing does not tell the two apart.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> AppResult<Json<PasswordResponse>> {
    let email = normalize_email(&required("email", payload.email.as_deref())?)?;

    if let Some(profile) = state.store.find_profile_by_email(&email).await? {
        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        state
            .store
            .set_reset_token(profile.id, &sha256_hex(&token), expires_at)
            .await?;

        let mail = state.templates.password_reset(&profile.email, &token);
        spawn_email(state.mailer.clone(), "password_reset", mail);
        tracing::info!(user_id = %profile.id, "Password reset requested");
    } else {
        tracing::debug!("Password reset requested for unknown email");
    }

    Ok(Json(PasswordResponse {
        success: true,
        message: FORGOT_MESSAGE.to_string(),
    }))
}

/// `POST /api/auth/reset-password`. The token is cleared before the password
/// changes, so a link works once.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<PasswordResponse>> {
    let email = normalize_email(&required("email", payload.email.as_deref())?)?;
    let token = required("token", payload.token.as_deref())?;
    let new_password = payload
        .new_password
        .ok_or_else(|| AppError::ValidationError("newPassword is required".to_string()))?;
    check_password(&new_password)?;

    let user_id = state
        .store
        .consume_reset_token(&email, &sha256_hex(&token), Utc::now())
        .await?
        .ok_or_else(|| AppError::ValidationError("Invalid or expired token".to_string()))?;

    state.auth.update_password(user_id, &new_password).await?;
    tracing::info!(user_id = %user_id, "Password reset completed");

    Ok(Json(PasswordResponse {
        success: true,
        message: "Password updated successfully".to_string(),
    }))
}
