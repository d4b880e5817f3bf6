//! In-process store with the same semantics as [`super::PgStore`].
//!
//! All state sits behind one lock so every operation is atomic, which is what
//! the conditional updates of the Postgres store guarantee.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AccountStore, BookingStore, ContactStore, EventStore, InfluencerStore, MarkPaid, StoreResult,
};
use crate::models::{
    Booking, BookingStatus, BookingSummary, ContactMessage, EmailVerification, Event, EventDraft,
    FeaturedEvent, Influencer, InfluencerSummary, NewBooking, Profile, ProfileUpsert,
    ReferralStats, Role, TicketType, TicketTypeDraft,
};
use crate::utils::AppError;

#[derive(Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    ticket_types: HashMap<Uuid, TicketType>,
    featured: Vec<FeaturedEvent>,
    bookings: HashMap<Uuid, Booking>,
    influencers: HashMap<Uuid, Influencer>,
    profiles: HashMap<Uuid, Profile>,
    verifications: HashMap<String, EmailVerification>,
    contact_messages: Vec<ContactMessage>,
}

impl Tables {
    fn replace_ticket_types(&mut self, event_id: Uuid, drafts: Vec<TicketTypeDraft>) {
        self.ticket_types.retain(|_, tt| tt.event_id != event_id);
        for draft in drafts {
            let tt = TicketType {
                id: Uuid::new_v4(),
                event_id,
                name: draft.name,
                price: draft.price,
                description: draft.description,
                sort_order: draft.sort_order,
            };
            self.ticket_types.insert(tt.id, tt);
        }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a profile directly. Used to seed admins and fixtures.
    pub async fn put_profile(&self, profile: Profile) {
        self.tables.write().await.profiles.insert(profile.id, profile);
    }

    /// Snapshot of stored contact messages.
    pub async fn contact_messages(&self) -> Vec<ContactMessage> {
        self.tables.read().await.contact_messages.clone()
    }
}

fn event_from_draft(id: Uuid, draft: EventDraft, created_at: DateTime<Utc>) -> Event {
    Event {
        id,
        title: draft.title,
        description: draft.description,
        date: draft.date,
        location: draft.location,
        price: draft.price,
        capacity: draft.capacity,
        image_url: draft.image_url,
        created_at,
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables.events.values().cloned().collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn create_event(
        &self,
        draft: EventDraft,
        ticket_types: Vec<TicketTypeDraft>,
    ) -> StoreResult<Event> {
        let mut tables = self.tables.write().await;
        let event = event_from_draft(Uuid::new_v4(), draft, Utc::now());
        tables.events.insert(event.id, event.clone());
        tables.replace_ticket_types(event.id, ticket_types);
        Ok(event)
    }

    async fn update_event(
        &self,
        id: Uuid,
        draft: EventDraft,
        ticket_types: Vec<TicketTypeDraft>,
    ) -> StoreResult<Option<Event>> {
        let mut tables = self.tables.write().await;
        let Some(created_at) = tables.events.get(&id).map(|e| e.created_at) else {
            return Ok(None);
        };
        let event = event_from_draft(id, draft, created_at);
        tables.events.insert(id, event.clone());
        tables.replace_ticket_types(id, ticket_types);
        Ok(Some(event))
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.events.remove(&id).is_none() {
            return Ok(false);
        }
        tables.ticket_types.retain(|_, tt| tt.event_id != id);
        tables.featured.retain(|f| f.event_id != id);
        tables.bookings.retain(|_, b| b.event_id != id);
        Ok(true)
    }

    async fn list_ticket_types(&self, event_id: Uuid) -> StoreResult<Vec<TicketType>> {
        let tables = self.tables.read().await;
        let mut types: Vec<TicketType> = tables
            .ticket_types
            .values()
            .filter(|tt| tt.event_id == event_id)
            .cloned()
            .collect();
        types.sort_by_key(|tt| tt.sort_order);
        Ok(types)
    }

    async fn get_ticket_type(&self, id: Uuid) -> StoreResult<Option<TicketType>> {
        Ok(self.tables.read().await.ticket_types.get(&id).cloned())
    }

    async fn list_featured(&self) -> StoreResult<Vec<FeaturedEvent>> {
        let mut featured = self.tables.read().await.featured.clone();
        featured.sort_by_key(|f| f.display_order);
        Ok(featured)
    }

    async fn toggle_featured(&self, event_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.featured.len();
        tables.featured.retain(|f| f.event_id != event_id);
        if tables.featured.len() != before {
            return Ok(false);
        }

        let display_order = tables
            .featured
            .iter()
            .map(|f| f.display_order)
            .max()
            .unwrap_or(0)
            + 1;
        tables.featured.push(FeaturedEvent {
            event_id,
            display_order,
        });
        Ok(true)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        let row = Booking {
            id: Uuid::new_v4(),
            event_id: booking.event_id,
            ticket_type_id: booking.ticket_type_id,
            quantity: booking.quantity,
            customer_name: booking.customer_name,
            customer_email: booking.customer_email,
            customer_phone: booking.customer_phone,
            amount: booking.amount,
            status: booking.status,
            razorpay_order_id: booking.razorpay_order_id,
            razorpay_payment_id: None,
            influencer_code: booking.influencer_code,
            email_sent_at: None,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .bookings
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn list_bookings(&self) -> StoreResult<Vec<BookingSummary>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BookingSummary> = tables
            .bookings
            .values()
            .map(|b| BookingSummary {
                booking: b.clone(),
                event_title: tables.events.get(&b.event_id).map(|e| e.title.clone()),
            })
            .collect();
        rows.sort_by(|a, b| b.booking.created_at.cmp(&a.booking.created_at));
        Ok(rows)
    }

    async fn delete_booking(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.bookings.remove(&id).is_some())
    }

    async fn mark_paid(&self, order_id: &str, payment_id: &str) -> StoreResult<MarkPaid> {
        let mut tables = self.tables.write().await;
        let Some(booking) = tables
            .bookings
            .values_mut()
            .find(|b| b.razorpay_order_id == order_id)
        else {
            return Ok(MarkPaid::NotFound);
        };

        if booking.status != BookingStatus::Pending {
            return Ok(MarkPaid::Unchanged(booking.clone()));
        }

        booking.status = BookingStatus::Paid;
        booking.razorpay_payment_id = Some(payment_id.to_string());
        Ok(MarkPaid::Updated(booking.clone()))
    }

    async fn claim_confirmation_email(&self, booking_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.bookings.get_mut(&booking_id) {
            Some(booking) if booking.email_sent_at.is_none() => {
                booking.email_sent_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_confirmation_email(&self, booking_id: Uuid) -> StoreResult<()> {
        if let Some(booking) = self.tables.write().await.bookings.get_mut(&booking_id) {
            booking.email_sent_at = None;
        }
        Ok(())
    }

    async fn referral_stats(&self, code: &str) -> StoreResult<ReferralStats> {
        let tables = self.tables.read().await;
        let mut stats = ReferralStats::default();
        for booking in tables
            .bookings
            .values()
            .filter(|b| b.influencer_code.as_deref() == Some(code))
        {
            stats.referred_bookings += 1;
            if booking.status == BookingStatus::Paid {
                stats.paid_bookings += 1;
                stats.paid_revenue += booking.amount;
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl InfluencerStore for InMemoryStore {
    async fn find_active_influencer(&self, code: &str) -> StoreResult<Option<Influencer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .influencers
            .values()
            .find(|i| i.active && i.code == code)
            .cloned())
    }

    async fn get_influencer(&self, id: Uuid) -> StoreResult<Option<Influencer>> {
        Ok(self.tables.read().await.influencers.get(&id).cloned())
    }

    async fn list_active_influencers(&self) -> StoreResult<Vec<InfluencerSummary>> {
        let tables = self.tables.read().await;
        let mut active: Vec<&Influencer> =
            tables.influencers.values().filter(|i| i.active).collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(active
            .into_iter()
            .map(|i| {
                let profile = tables.profiles.get(&i.id);
                InfluencerSummary::new(
                    i,
                    profile.and_then(|p| p.full_name.as_deref()),
                    profile.map(|p| p.email.as_str()),
                )
            })
            .collect())
    }

    async fn insert_influencer(
        &self,
        id: Uuid,
        email: Option<&str>,
        code: &str,
        discount_percent: Decimal,
    ) -> StoreResult<Influencer> {
        let mut tables = self.tables.write().await;
        if tables
            .influencers
            .values()
            .any(|i| i.code == code && i.id != id)
        {
            return Err(AppError::Conflict("referral code already exists".to_string()));
        }

        let created_at = tables
            .influencers
            .get(&id)
            .map(|i| i.created_at)
            .unwrap_or_else(Utc::now);
        let influencer = Influencer {
            id,
            email: email.map(str::to_string),
            code: code.to_string(),
            discount_percent,
            active: true,
            created_at,
        };
        tables.influencers.insert(id, influencer.clone());
        Ok(influencer)
    }

    async fn deactivate_influencer(&self, id: Uuid) -> StoreResult<bool> {
        match self.tables.write().await.influencers.get_mut(&id) {
            Some(influencer) => {
                influencer.active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn upsert_otp(
        &self,
        email: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.tables.write().await.verifications.insert(
            email.to_string(),
            EmailVerification {
                email: email.to_string(),
                otp: otp.to_string(),
                expires_at,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn consume_otp(&self, email: &str, otp: &str, now: DateTime<Utc>) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let matches = tables
            .verifications
            .get(email)
            .is_some_and(|v| v.otp == otp && v.expires_at > now);
        if matches {
            tables.verifications.remove(email);
        }
        Ok(matches)
    }

    async fn get_profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn find_profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn upsert_profile(&self, upsert: ProfileUpsert) -> StoreResult<Profile> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let profile = match tables.profiles.get(&upsert.id) {
            Some(existing) => Profile {
                email: upsert.email,
                full_name: Some(upsert.full_name),
                role: if existing.role.is_privileged() {
                    existing.role
                } else {
                    upsert.role
                },
                email_verified: true,
                updated_at: now,
                ..existing.clone()
            },
            None => Profile {
                id: upsert.id,
                email: upsert.email,
                full_name: Some(upsert.full_name),
                role: upsert.role,
                email_verified: true,
                reset_token_hash: None,
                reset_token_expires_at: None,
                created_at: now,
                updated_at: now,
            },
        };
        tables.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<bool> {
        match self.tables.write().await.profiles.get_mut(&id) {
            Some(profile) => {
                profile.role = role;
                profile.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_profiles_by_role(&self, role: Role) -> StoreResult<Vec<Profile>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Profile> = tables
            .profiles
            .values()
            .filter(|p| p.role == role)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        if let Some(profile) = self.tables.write().await.profiles.get_mut(&id) {
            profile.reset_token_hash = Some(token_hash.to_string());
            profile.reset_token_expires_at = Some(expires_at);
            profile.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        email: &str,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Uuid>> {
        let mut tables = self.tables.write().await;
        let profile = tables.profiles.values_mut().find(|p| {
            p.email.eq_ignore_ascii_case(email)
                && p.reset_token_hash.as_deref() == Some(token_hash)
                && p.reset_token_expires_at.is_some_and(|at| at > now)
        });

        Ok(profile.map(|p| {
            p.reset_token_hash = None;
            p.reset_token_expires_at = None;
            p.updated_at = Utc::now();
            p.id
        }))
    }
}

#[async_trait]
impl ContactStore for InMemoryStore {
    async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> StoreResult<ContactMessage> {
        let row = ContactMessage {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            status: "new".to_string(),
            created_at: Utc::now(),
        };
        self.tables.write().await.contact_messages.push(row.clone());
        Ok(row)
    }
}
