use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A referral account. Rows are deactivated rather than deleted because
/// bookings keep referencing the code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Influencer {
    /// Same id as the owning profile.
    pub id: Uuid,
    pub email: Option<String>,
    pub code: String,
    pub discount_percent: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfluencerSummary {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: Decimal,
    pub display_name: String,
    pub display_email: String,
}

impl InfluencerSummary {
    /// Builds a listing row, preferring the profile's name and falling back to
    /// the local part of whichever email is known.
    pub fn new(
        influencer: &Influencer,
        full_name: Option<&str>,
        profile_email: Option<&str>,
    ) -> Self {
        let email = profile_email
            .filter(|e| !e.is_empty())
            .or(influencer.email.as_deref().filter(|e| !e.is_empty()));

        let display_name = full_name
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .or_else(|| email.and_then(|e| e.split('@').next()).map(str::to_string))
            .unwrap_or_else(|| "Unknown User".to_string());

        Self {
            id: influencer.id,
            code: influencer.code.clone(),
            discount_percent: influencer.discount_percent,
            display_name,
            display_email: email.unwrap_or("No Email").to_string(),
        }
    }
}

/// Booking counts attributed to one referral code.
#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct ReferralStats {
    pub referred_bookings: i64,
    pub paid_bookings: i64,
    pub paid_revenue: Decimal,
}
