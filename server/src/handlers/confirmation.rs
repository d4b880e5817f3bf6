//! Booking confirmation delivery shared by the webhook and free checkouts.

use crate::models::Booking;
use crate::notify::send_best_effort;
use crate::state::AppState;
use crate::utils::AppResult;

/// Sends the confirmation at most once per booking. The `email_sent_at`
/// claim is taken before sending and released if the send fails, so a later
/// gateway retry can try again. Returns whether an email went out.
pub(crate) async fn send_once(state: &AppState, booking: &Booking) -> AppResult<bool> {
    if !state.store.claim_confirmation_email(booking.id).await? {
        tracing::debug!(booking_id = %booking.id, "Confirmation already sent");
        return Ok(false);
    }

    let Some(event) = state.store.get_event(booking.event_id).await? else {
        tracing::warn!(
            booking_id = %booking.id,
            event_id = %booking.event_id,
            "Booking references a missing event; confirmation skipped"
        );
        state.store.release_confirmation_email(booking.id).await?;
        return Ok(false);
    };

    let email = state.templates.booking_confirmation(booking, &event, false);
    if send_best_effort(state.mailer.as_ref(), "booking_confirmation", email).await {
        tracing::info!(booking_id = %booking.id, "Confirmation email sent");
        Ok(true)
    } else {
        state.store.release_confirmation_email(booking.id).await?;
        Ok(false)
    }
}
