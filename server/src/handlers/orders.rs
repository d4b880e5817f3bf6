use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::confirmation;
use crate::gateway::OrderRequest;
use crate::models::{BookingStatus, NewBooking, TicketType};
use crate::notify::spawn_best_effort;
use crate::pricing;
use crate::state::AppState;
use crate::utils::validation::{normalize_email, required};
use crate::utils::{AppError, AppResult};

pub const MAX_QUANTITY: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub event_id: Option<String>,
    pub ticket_type_id: Option<String>,
    pub quantity: Option<i64>,
    pub influencer_code: Option<String>,
    pub customer_details: Option<CustomerDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub key: String,
    pub booking_id: Uuid,
}

fn parse_id(field: &str, raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::ValidationError(format!("{} is not a valid id", field)))
}

fn free_order_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("free_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// `POST /api/create-razorpay-order`
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<CreateOrderResponse>> {
    let customer = payload
        .customer_details
        .ok_or_else(|| AppError::ValidationError("customerDetails is required".to_string()))?;
    let customer_name = required("customerDetails.name", customer.name.as_deref())?;
    let customer_email = normalize_email(&required(
        "customerDetails.email",
        customer.email.as_deref(),
    )?)?;
    let customer_phone = customer.phone.unwrap_or_default().trim().to_string();

    let quantity = payload.quantity.unwrap_or(1);
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::ValidationError(format!(
            "quantity must be between 1 and {}",
            MAX_QUANTITY
        )));
    }

    let event_id = parse_id("eventId", &required("eventId", payload.event_id.as_deref())?)?;
    let event = state
        .store
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let ticket_type: Option<TicketType> = match payload
        .ticket_type_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        Some(raw) => {
            let id = parse_id("ticketTypeId", raw)?;
            let tt = state
                .store
                .get_ticket_type(id)
                .await?
                .filter(|tt| tt.event_id == event.id)
                .ok_or_else(|| AppError::ValidationError("Invalid ticket type".to_string()))?;
            Some(tt)
        }
        None => None,
    };

    let influencer = match payload
        .influencer_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        Some(code) => {
            let found = state.store.find_active_influencer(code).await?;
            if found.is_none() {
                tracing::info!(code = %code, "Ignoring unknown or inactive influencer code");
            }
            found
        }
        None => None,
    };

    let unit_price = pricing::resolve_unit_price(&event, ticket_type.as_ref());
    let quote = pricing::quote(
        unit_price,
        influencer.as_ref().map(|i| i.discount_percent),
        quantity as u32,
    );
    let currency = state.config.razorpay.currency.clone();

    let (order_id, status) = if quote.is_free() {
        (free_order_id(), BookingStatus::Paid)
    } else {
        let mut notes = BTreeMap::new();
        notes.insert("event_id".to_string(), event.id.to_string());
        notes.insert("customer_email".to_string(), customer_email.clone());
        notes.insert("quantity".to_string(), quantity.to_string());
        if let Some(tt) = &ticket_type {
            notes.insert("ticket_type_id".to_string(), tt.id.to_string());
        }
        if let Some(inf) = &influencer {
            notes.insert("influencer_code".to_string(), inf.code.clone());
        }

        let order = state
            .gateway
            .create_order(OrderRequest {
                amount: quote.amount_minor,
                currency: currency.clone(),
                receipt: format!("rcpt_{}", Utc::now().timestamp_millis()),
                notes,
            })
            .await?;
        (order.id, BookingStatus::Pending)
    };

    let booking = state
        .store
        .insert_booking(NewBooking {
            event_id: event.id,
            ticket_type_id: ticket_type.as_ref().map(|tt| tt.id),
            quantity: quantity as i32,
            customer_name,
            customer_email,
            customer_phone,
            amount: quote.total,
            status,
            razorpay_order_id: order_id.clone(),
            influencer_code: influencer.map(|i| i.code),
        })
        .await?;

    tracing::info!(
        booking_id = %booking.id,
        order_id = %order_id,
        amount_minor = quote.amount_minor,
        status = %booking.status,
        "Booking created"
    );

    if booking.status == BookingStatus::Paid {
        let state = state.clone();
        let booking = booking.clone();
        spawn_best_effort("booking_confirmation", async move {
            confirmation::send_once(&state, &booking).await
        });
    }

    Ok(Json(CreateOrderResponse {
        order_id,
        amount: quote.amount_minor,
        currency,
        key: state.gateway.key_id().to_string(),
        booking_id: booking.id,
    }))
}
