use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Paid,
    Failed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Paid => "paid",
            BookingStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "paid" => Ok(BookingStatus::Paid),
            "failed" => Ok(BookingStatus::Failed),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_type_id: Option<Uuid>,
    pub quantity: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// Total charged in major currency units, computed server-side.
    pub amount: Decimal,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    pub influencer_code: Option<String>,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A booking about to be written; the id and timestamps come from storage.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub event_id: Uuid,
    pub ticket_type_id: Option<Uuid>,
    pub quantity: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub amount: Decimal,
    pub status: BookingStatus,
    pub razorpay_order_id: String,
    pub influencer_code: Option<String>,
}

/// Admin listing row: a booking joined with its event's title.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub event_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_known_values() {
        assert_eq!(
            BookingStatus::try_from("paid".to_string()).unwrap(),
            BookingStatus::Paid
        );
        assert_eq!(
            BookingStatus::try_from("pending".to_string()).unwrap(),
            BookingStatus::Pending
        );
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        assert!(BookingStatus::try_from("refunded".to_string()).is_err());
    }
}
