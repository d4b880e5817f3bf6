//! Admin dashboard API. Every handler requires the `admin` role.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::templates::ApprovalDecision;
use crate::extract::CurrentProfile;
use crate::models::{
    BookingSummary, Event, EventDraft, InfluencerSummary, Profile, Role, TicketType,
    TicketTypeDraft,
};
use crate::notify::spawn_email;
use crate::referral::{generate_code, insert_with_unique_code};
use crate::state::AppState;
use crate::utils::response::{empty_success, success};
use crate::utils::validation::required;
use crate::utils::{AppError, AppResult};

const DEFAULT_CAPACITY: i32 = 100;

fn admin_only(caller: CurrentProfile) -> AppResult<Profile> {
    caller.require(&[Role::Admin])
}

#[derive(Debug, Serialize)]
pub struct AdminEventRow {
    #[serde(flatten)]
    pub event: Event,
    pub featured: bool,
    pub ticket_types: Vec<TicketType>,
}

/// Rows backing one dashboard section.
#[derive(Debug, Serialize)]
#[serde(tag = "section", content = "rows", rename_all = "snake_case")]
pub enum SectionView {
    Events(Vec<AdminEventRow>),
    Influencers(Vec<InfluencerSummary>),
    Bookings(Vec<BookingSummary>),
    Approvals(Vec<Profile>),
}

/// `GET /api/admin/sections/:section`
pub async fn get_section(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Path(section): Path<String>,
) -> AppResult<Response> {
    admin_only(caller)?;

    let view = match section.as_str() {
        "events" => {
            let featured: HashSet<Uuid> = state
                .store
                .list_featured()
                .await?
                .into_iter()
                .map(|f| f.event_id)
                .collect();
            let mut rows = Vec::new();
            for event in state.store.list_events().await? {
                let ticket_types = state.store.list_ticket_types(event.id).await?;
                rows.push(AdminEventRow {
                    featured: featured.contains(&event.id),
                    event,
                    ticket_types,
                });
            }
            SectionView::Events(rows)
        }
        "influencers" => SectionView::Influencers(state.store.list_active_influencers().await?),
        "bookings" => SectionView::Bookings(state.store.list_bookings().await?),
        "approvals" => SectionView::Approvals(
            state
                .store
                .list_profiles_by_role(Role::PendingInfluencer)
                .await?,
        ),
        other => return Err(AppError::NotFound(format!("Unknown section '{}'", other))),
    };

    Ok(success(view, "Section loaded"))
}

#[derive(Debug, Deserialize)]
pub struct TicketTypeRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub ticket_types: Vec<TicketTypeRequest>,
}

impl EventRequest {
    /// Validates the form. The event's flat price becomes the cheapest ticket
    /// type so older readers of `events.price` stay meaningful.
    pub fn into_drafts(self) -> AppResult<(EventDraft, Vec<TicketTypeDraft>)> {
        let title = required("title", self.title.as_deref())?;
        let location = required("location", self.location.as_deref())?;
        let date = self
            .date
            .ok_or_else(|| AppError::ValidationError("date is required".to_string()))?;
        let capacity = self.capacity.unwrap_or(DEFAULT_CAPACITY);
        if capacity < 0 {
            return Err(AppError::ValidationError(
                "capacity cannot be negative".to_string(),
            ));
        }
        if self.ticket_types.is_empty() {
            return Err(AppError::ValidationError(
                "At least one ticket type is required".to_string(),
            ));
        }

        let mut ticket_types = Vec::with_capacity(self.ticket_types.len());
        for (index, tt) in self.ticket_types.into_iter().enumerate() {
            let name = required("ticket type name", tt.name.as_deref())?;
            let price = tt.price.ok_or_else(|| {
                AppError::ValidationError(format!("Ticket type '{}' needs a price", name))
            })?;
            if price < Decimal::ZERO {
                return Err(AppError::ValidationError(format!(
                    "Ticket type '{}' has a negative price",
                    name
                )));
            }
            ticket_types.push(TicketTypeDraft {
                name,
                price,
                description: tt.description.filter(|d| !d.trim().is_empty()),
                sort_order: index as i32,
            });
        }

        let price = ticket_types
            .iter()
            .map(|tt| tt.price)
            .min()
            .unwrap_or(Decimal::ZERO);

        let draft = EventDraft {
            title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            date,
            location,
            price,
            capacity,
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
        };
        Ok((draft, ticket_types))
    }
}

/// `POST /api/admin/events`
pub async fn create_event(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Json(payload): Json<EventRequest>,
) -> AppResult<Response> {
    admin_only(caller)?;
    let (draft, ticket_types) = payload.into_drafts()?;
    let event = state.store.create_event(draft, ticket_types).await?;
    Ok(success(event, "Event created"))
}

/// `PUT /api/admin/events/:id`
pub async fn update_event(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventRequest>,
) -> AppResult<Response> {
    admin_only(caller)?;
    let (draft, ticket_types) = payload.into_drafts()?;
    let event = state
        .store
        .update_event(id, draft, ticket_types)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    tracing::info!(event_id = %id, "Event updated");
    Ok(success(event, "Event updated"))
}

/// `DELETE /api/admin/events/:id`
pub async fn delete_event(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    admin_only(caller)?;
    if !state.store.delete_event(id).await? {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    tracing::info!(event_id = %id, "Event deleted");
    Ok(empty_success("Event deleted"))
}

#[derive(Debug, Serialize)]
pub struct FeaturedState {
    pub featured: bool,
}

/// `POST /api/admin/events/:id/featured`
pub async fn toggle_featured(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    admin_only(caller)?;
    if state.store.get_event(id).await?.is_none() {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    let featured = state.store.toggle_featured(id).await?;
    Ok(success(FeaturedState { featured }, "Featured state updated"))
}

/// `DELETE /api/admin/bookings/:id`
pub async fn delete_booking(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    admin_only(caller)?;
    if !state.store.delete_booking(id).await? {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    tracing::info!(booking_id = %id, "Booking deleted");
    Ok(empty_success("Booking deleted"))
}

/// `DELETE /api/admin/influencers/:id`. The row stays so past bookings keep
/// their attribution; the code stops validating.
pub async fn revoke_influencer(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    admin_only(caller)?;
    if !state.store.deactivate_influencer(id).await? {
        return Err(AppError::NotFound("Influencer not found".to_string()));
    }
    state.store.set_role(id, Role::User).await?;
    tracing::info!(influencer_id = %id, "Influencer revoked");
    Ok(empty_success("Influencer revoked"))
}

async fn pending_applicant(state: &AppState, id: Uuid) -> AppResult<Profile> {
    let profile = state
        .store
        .get_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Applicant not found".to_string()))?;
    if profile.role != Role::PendingInfluencer {
        return Err(AppError::ValidationError(
            "Profile has no pending influencer application".to_string(),
        ));
    }
    Ok(profile)
}

#[derive(Debug, Serialize)]
pub struct ApprovalResult {
    pub code: String,
}

/// `POST /api/admin/approvals/:id/approve`
pub async fn approve_application(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    admin_only(caller)?;
    let profile = pending_applicant(&state, id).await?;
    let discount = state.config.default_influencer_discount;

    let influencer = insert_with_unique_code(
        state.store.as_ref(),
        id,
        Some(&profile.email),
        discount,
        || generate_code(profile.full_name.as_deref()),
    )
    .await?;

    state.store.set_role(id, Role::Influencer).await?;
    tracing::info!(influencer_id = %id, code = %influencer.code, "Influencer approved");

    spawn_email(
        state.mailer.clone(),
        "approval",
        state.templates.approval(
            &profile.email,
            profile.full_name.as_deref(),
            &ApprovalDecision::Approved {
                code: Some(influencer.code.clone()),
            },
        ),
    );

    Ok(success(
        ApprovalResult {
            code: influencer.code,
        },
        "Influencer approved",
    ))
}

/// `POST /api/admin/approvals/:id/reject`
pub async fn reject_application(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    admin_only(caller)?;
    let profile = pending_applicant(&state, id).await?;

    state.store.set_role(id, Role::User).await?;
    tracing::info!(profile_id = %id, "Influencer application rejected");

    spawn_email(
        state.mailer.clone(),
        "rejection",
        state.templates.approval(
            &profile.email,
            profile.full_name.as_deref(),
            &ApprovalDecision::Rejected,
        ),
    );

    Ok(empty_success("Application rejected"))
}
