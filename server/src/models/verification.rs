use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Outstanding one-time passcode; at most one row per email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailVerification {
    pub email: String,
    pub otp: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
