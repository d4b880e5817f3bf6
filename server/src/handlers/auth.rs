//! Email one-time-passcode sign-up and sign-in.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth_admin::create_or_update_user;
use crate::models::{ProfileUpsert, Role};
use crate::state::AppState;
use crate::tokens::{generate_otp, OTP_TTL_MINUTES};
use crate::utils::validation::{check_password, normalize_email, required};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct InfluencerData {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub apply_influencer: bool,
    pub influencer_data: Option<InfluencerData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub redirect_url: String,
    pub message: String,
}

/// `POST /api/auth/send-otp`
pub async fn send_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendOtpRequest>,
) -> AppResult<Json<SendOtpResponse>> {
    let email = normalize_email(&required("email", payload.email.as_deref())?)?;

    let otp = generate_otp();
    let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);
    state.store.upsert_otp(&email, &otp, expires_at).await?;

    state.mailer.send(state.templates.otp(&email, &otp)).await?;
    tracing::info!(email = %email, "Verification code sent");

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
    }))
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// `POST /api/auth/verify-otp`
///
/// Consumes the passcode, creates the account (or resets the password of an
/// existing one), records the profile, and hands back a one-time login link.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<VerifyOtpResponse>> {
    let email = normalize_email(&required("email", payload.email.as_deref())?)?;
    let otp = required("otp", payload.otp.as_deref())?;
    let password = payload
        .password
        .ok_or_else(|| AppError::ValidationError("password is required".to_string()))?;
    check_password(&password)?;

    if !state.store.consume_otp(&email, &otp, Utc::now()).await? {
        return Err(AppError::ValidationError("Invalid or expired OTP".to_string()));
    }

    let user_id = create_or_update_user(state.auth.as_ref(), &email, &password).await?;

    let full_name = payload
        .influencer_data
        .and_then(|d| d.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| local_part(&email).to_string());
    let role = if payload.apply_influencer {
        Role::PendingInfluencer
    } else {
        Role::User
    };

    match state
        .store
        .upsert_profile(ProfileUpsert {
            id: user_id,
            email: email.clone(),
            full_name,
            role,
        })
        .await
    {
        Ok(profile) => {
            tracing::info!(user_id = %user_id, role = %profile.role, "Profile recorded")
        }
        Err(e) => tracing::error!(user_id = %user_id, error = %e, "Profile upsert failed"),
    }

    let redirect_url = state
        .auth
        .generate_magic_link(&email, &state.config.site_url)
        .await?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        redirect_url,
        message: "Verified successfully".to_string(),
    }))
}
