use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    /// Flat price, only authoritative when the event has no ticket types.
    pub price: Decimal,
    pub capacity: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketType {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeaturedEvent {
    pub event_id: Uuid,
    pub display_order: i32,
}

/// Fields an admin supplies when creating or editing an event.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub price: Decimal,
    pub capacity: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TicketTypeDraft {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub sort_order: i32,
}
