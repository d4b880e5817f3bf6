use axum::extract::State;
use axum::response::Response;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::extract::CurrentProfile;
use crate::models::Role;
use crate::state::AppState;
use crate::utils::response::success;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDashboard {
    pub code: String,
    pub discount_percent: Decimal,
    pub referred_bookings: i64,
    pub paid_bookings: i64,
    pub paid_revenue: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InfluencerDashboard {
    Pending,
    Active(ActiveDashboard),
}

/// `GET /api/influencer/me`
pub async fn dashboard(
    State(state): State<AppState>,
    caller: CurrentProfile,
) -> AppResult<Response> {
    let profile = caller.require(&[Role::Influencer, Role::PendingInfluencer])?;

    if profile.role == Role::PendingInfluencer {
        return Ok(success(InfluencerDashboard::Pending, "Application pending"));
    }

    let influencer = state
        .store
        .get_influencer(profile.id)
        .await?
        .filter(|i| i.active)
        .ok_or_else(|| AppError::NotFound("Influencer account not found".to_string()))?;
    let stats = state.store.referral_stats(&influencer.code).await?;

    Ok(success(
        InfluencerDashboard::Active(ActiveDashboard {
            code: influencer.code,
            discount_percent: influencer.discount_percent,
            referred_bookings: stats.referred_bookings,
            paid_bookings: stats.paid_bookings,
            paid_revenue: stats.paid_revenue,
        }),
        "Dashboard loaded",
    ))
}
