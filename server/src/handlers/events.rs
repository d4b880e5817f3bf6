//! Public event listings.

use axum::extract::{Path, State};
use axum::response::Response;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Event, TicketType};
use crate::state::AppState;
use crate::utils::response::success;
use crate::utils::{AppError, AppResult};

const LEGACY_TICKET_NAME: &str = "General Admission";

/// A purchasable option. `id` is absent for the single option synthesised
/// from an event's flat price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketOption {
    pub id: Option<Uuid>,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub ticket_types: Vec<TicketOption>,
    pub min_price: Decimal,
    pub max_price: Decimal,
}

pub fn ticket_options(event: &Event, types: Vec<TicketType>) -> Vec<TicketOption> {
    if types.is_empty() {
        return vec![TicketOption {
            id: None,
            name: LEGACY_TICKET_NAME.to_string(),
            price: event.price,
            description: None,
        }];
    }

    types
        .into_iter()
        .map(|tt| TicketOption {
            id: Some(tt.id),
            name: tt.name,
            price: tt.price,
            description: tt.description,
        })
        .collect()
}

/// `GET /api/events`
pub async fn list_events(State(state): State<AppState>) -> AppResult<Response> {
    let events = state.store.list_events().await?;
    Ok(success(events, "Events loaded"))
}

/// `GET /api/events/featured`
pub async fn list_featured(State(state): State<AppState>) -> AppResult<Response> {
    let mut events = Vec::new();
    for featured in state.store.list_featured().await? {
        if let Some(event) = state.store.get_event(featured.event_id).await? {
            events.push(event);
        }
    }
    Ok(success(events, "Featured events loaded"))
}

/// `GET /api/events/:id`
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let event = state
        .store
        .get_event(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let options = ticket_options(&event, state.store.list_ticket_types(id).await?);
    let min_price = options.iter().map(|o| o.price).min().unwrap_or(event.price);
    let max_price = options.iter().map(|o| o.price).max().unwrap_or(event.price);

    Ok(success(
        EventDetail {
            event,
            ticket_types: options,
            min_price,
            max_price,
        },
        "Event loaded",
    ))
}
