use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use super::confirmation;
use crate::gateway::webhook::WebhookEnvelope;
use crate::models::BookingStatus;
use crate::state::AppState;
use crate::store::MarkPaid;
use crate::tokens::verify_signature;
use crate::utils::{AppError, AppResult};

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    status: &'static str,
}

fn ack() -> Json<WebhookAck> {
    Json(WebhookAck { status: "ok" })
}

/// `POST /api/razorpay-webhook`
///
/// The signature is checked over the exact bytes received before anything in
/// the body is read. Once it passes, every outcome other than a storage
/// failure is acknowledged with 200 so the gateway stops retrying.
pub async fn razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::ValidationError("Missing signature".to_string()))?;

    if !verify_signature(&state.config.razorpay.webhook_secret, &body, signature) {
        return Err(AppError::ValidationError("Invalid signature".to_string()));
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "Signed webhook body could not be parsed");
            return Ok(ack());
        }
    };

    let Some(payment) = envelope.paid_payment() else {
        tracing::info!(event = %envelope.event, "Ignoring webhook event");
        return Ok(ack());
    };
    let Some(order_id) = payment.order_id.as_deref() else {
        return Ok(ack());
    };

    let booking = match state.store.mark_paid(order_id, &payment.id).await? {
        MarkPaid::Updated(booking) => {
            tracing::info!(
                booking_id = %booking.id,
                order_id = %order_id,
                payment_id = %payment.id,
                "Booking marked paid"
            );
            booking
        }
        MarkPaid::Unchanged(booking) if booking.status == BookingStatus::Paid => {
            tracing::info!(booking_id = %booking.id, order_id = %order_id, "Duplicate payment notification");
            booking
        }
        MarkPaid::Unchanged(booking) => {
            tracing::warn!(
                booking_id = %booking.id,
                status = %booking.status,
                order_id = %order_id,
                "Payment notification for a booking that is not pending"
            );
            return Ok(ack());
        }
        MarkPaid::NotFound => {
            tracing::warn!(order_id = %order_id, "Payment notification for unknown order");
            return Ok(ack());
        }
    };

    if let Err(e) = confirmation::send_once(&state, &booking).await {
        tracing::error!(booking_id = %booking.id, error = %e, "Confirmation bookkeeping failed");
    }

    Ok(ack())
}
