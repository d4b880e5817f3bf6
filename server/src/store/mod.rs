//! Storage abstractions.
//!
//! Handlers depend on these traits only. [`PgStore`] talks to the hosted
//! Postgres database with the service role; [`InMemoryStore`] backs tests.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    Booking, BookingSummary, ContactMessage, Event, EventDraft, FeaturedEvent, Influencer,
    InfluencerSummary, NewBooking, Profile, ProfileUpsert, ReferralStats, Role, TicketType,
    TicketTypeDraft,
};
use crate::utils::AppError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, AppError>;

/// Result of applying a paid notification to a booking.
#[derive(Debug, Clone)]
pub enum MarkPaid {
    /// The booking moved from pending to paid.
    Updated(Booking),
    /// The booking was not pending (already paid, or failed) and was left as is.
    Unchanged(Booking),
    NotFound,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events, soonest first.
    async fn list_events(&self) -> StoreResult<Vec<Event>>;

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>>;

    async fn create_event(
        &self,
        draft: EventDraft,
        ticket_types: Vec<TicketTypeDraft>,
    ) -> StoreResult<Event>;

    /// Updates the event and replaces its ticket types wholesale.
    async fn update_event(
        &self,
        id: Uuid,
        draft: EventDraft,
        ticket_types: Vec<TicketTypeDraft>,
    ) -> StoreResult<Option<Event>>;

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool>;

    /// Ticket types of one event in display order.
    async fn list_ticket_types(&self, event_id: Uuid) -> StoreResult<Vec<TicketType>>;

    async fn get_ticket_type(&self, id: Uuid) -> StoreResult<Option<TicketType>>;

    /// Featured events in display order.
    async fn list_featured(&self) -> StoreResult<Vec<FeaturedEvent>>;

    /// Adds the event to the end of the featured list, or removes it if it is
    /// already there. Returns whether the event is featured afterwards.
    async fn toggle_featured(&self, event_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>>;

    /// All bookings, newest first, with their event titles.
    async fn list_bookings(&self) -> StoreResult<Vec<BookingSummary>>;

    async fn delete_booking(&self, id: Uuid) -> StoreResult<bool>;

    /// Moves the booking holding `order_id` from pending to paid and records
    /// the gateway payment id. Never moves a booking out of paid.
    async fn mark_paid(&self, order_id: &str, payment_id: &str) -> StoreResult<MarkPaid>;

    /// Sets `email_sent_at` only if it is still unset. Returns true for the
    /// single caller that wins; only that caller sends the confirmation.
    async fn claim_confirmation_email(&self, booking_id: Uuid) -> StoreResult<bool>;

    /// Clears `email_sent_at` after a failed send so a later delivery can retry.
    async fn release_confirmation_email(&self, booking_id: Uuid) -> StoreResult<()>;

    async fn referral_stats(&self, code: &str) -> StoreResult<ReferralStats>;
}

#[async_trait]
pub trait InfluencerStore: Send + Sync {
    /// Looks up an active influencer by code. Inactive and unknown codes are
    /// indistinguishable.
    async fn find_active_influencer(&self, code: &str) -> StoreResult<Option<Influencer>>;

    async fn get_influencer(&self, id: Uuid) -> StoreResult<Option<Influencer>>;

    /// Active influencers, newest first, with display names from profiles.
    async fn list_active_influencers(&self) -> StoreResult<Vec<InfluencerSummary>>;

    /// Creates (or reactivates) the influencer row for a profile. Fails with
    /// `AppError::Conflict` if `code` is already taken.
    async fn insert_influencer(
        &self,
        id: Uuid,
        email: Option<&str>,
        code: &str,
        discount_percent: Decimal,
    ) -> StoreResult<Influencer>;

    /// Soft delete: bookings keep referencing the code.
    async fn deactivate_influencer(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Stores `otp` for `email`, replacing any outstanding code.
    async fn upsert_otp(&self, email: &str, otp: &str, expires_at: DateTime<Utc>)
        -> StoreResult<()>;

    /// Deletes the code if it matches and has not expired at `now`. Returns
    /// whether a code was consumed.
    async fn consume_otp(&self, email: &str, otp: &str, now: DateTime<Utc>) -> StoreResult<bool>;

    async fn get_profile(&self, id: Uuid) -> StoreResult<Option<Profile>>;

    async fn find_profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>>;

    /// Inserts or refreshes a profile after email verification. An existing
    /// admin or influencer role is kept.
    async fn upsert_profile(&self, profile: ProfileUpsert) -> StoreResult<Profile>;

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<bool>;

    /// Profiles holding `role`, most recently updated first.
    async fn list_profiles_by_role(&self, role: Role) -> StoreResult<Vec<Profile>>;

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Clears the reset token if `token_hash` matches the profile with `email`
    /// and is unexpired at `now`. Returns the profile id on success.
    async fn consume_reset_token(
        &self,
        email: &str,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Uuid>>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> StoreResult<ContactMessage>;
}

/// Everything the handlers need from storage.
pub trait Store: EventStore + BookingStore + InfluencerStore + AccountStore + ContactStore {}

impl<T> Store for T where T: EventStore + BookingStore + InfluencerStore + AccountStore + ContactStore
{}
