use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::templates::ApprovalDecision;
use crate::extract::CurrentProfile;
use crate::models::{BookingStatus, Role};
use crate::notify::{send_best_effort, spawn_email};
use crate::state::AppState;
use crate::utils::response::message;
use crate::utils::validation::{normalize_email, required};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// `POST /api/contact`
pub async fn contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> AppResult<Response> {
    let name = required("name", payload.name.as_deref())?;
    let email = normalize_email(&required("email", payload.email.as_deref())?)?;
    let text = required("message", payload.message.as_deref())?;

    let stored = state
        .store
        .insert_contact_message(&name, &email, &text)
        .await?;
    tracing::info!(message_id = %stored.id, "Contact message stored");

    spawn_email(
        state.mailer.clone(),
        "contact_notification",
        state.templates.contact_notification(&name, &email, &text),
    );

    Ok(message("Message sent successfully"))
}

#[derive(Debug, Deserialize)]
pub struct ApprovalEmailRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub code: Option<String>,
}

/// `POST /api/send-approval-email` (admin only). A failed send is logged and
/// does not fail the request.
pub async fn send_approval_email(
    State(state): State<AppState>,
    caller: CurrentProfile,
    Json(payload): Json<ApprovalEmailRequest>,
) -> AppResult<Response> {
    caller.require(&[Role::Admin])?;

    let email = normalize_email(&required("email", payload.email.as_deref())?)?;
    let decision = match required("status", payload.status.as_deref())?.as_str() {
        "approved" => ApprovalDecision::Approved { code: payload.code },
        "rejected" => ApprovalDecision::Rejected,
        other => {
            return Err(AppError::ValidationError(format!(
                "status must be 'approved' or 'rejected', got '{}'",
                other
            )))
        }
    };

    let mail = state
        .templates
        .approval(&email, payload.name.as_deref(), &decision);
    send_best_effort(state.mailer.as_ref(), "approval", mail).await;

    Ok(message("Approval email processed"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEmailRequest {
    pub booking_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingEmailResponse {
    pub message: String,
    pub id: String,
}

/// `POST /api/send-booking-email`. Resends the confirmation of a paid
/// booking; unlike the webhook path a provider failure is reported.
pub async fn send_booking_email(
    State(state): State<AppState>,
    Json(payload): Json<BookingEmailRequest>,
) -> AppResult<Json<BookingEmailResponse>> {
    let raw_id = required("bookingId", payload.booking_id.as_deref())?;
    let booking_id = Uuid::parse_str(&raw_id)
        .map_err(|_| AppError::ValidationError("bookingId is not a valid id".to_string()))?;

    let booking = state
        .store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.status != BookingStatus::Paid {
        return Err(AppError::ValidationError("Booking is not paid".to_string()));
    }

    let event = state
        .store
        .get_event(booking.event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let id = state
        .mailer
        .send(state.templates.booking_confirmation(&booking, &event, true))
        .await?;
    tracing::info!(booking_id = %booking.id, message_id = %id, "Confirmation resent");

    Ok(Json(BookingEmailResponse {
        message: "Email sent".to_string(),
        id,
    }))
}
