use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    PendingInfluencer,
    Influencer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::PendingInfluencer => "pending_influencer",
            Role::Influencer => "influencer",
            Role::Admin => "admin",
        }
    }

    /// Roles granted by an approval decision are never overwritten by a
    /// sign-up flow.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Influencer | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Role::User),
            "pending_influencer" => Ok(Role::PendingInfluencer),
            "influencer" => Ok(Role::Influencer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Same id as the hosted auth user.
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by the sign-up flow.
#[derive(Debug, Clone)]
pub struct ProfileUpsert {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}
