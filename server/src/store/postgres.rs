//! Postgres-backed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    AccountStore, BookingStore, ContactStore, EventStore, InfluencerStore, MarkPaid, StoreResult,
};
use crate::models::{
    Booking, BookingSummary, ContactMessage, Event, EventDraft, FeaturedEvent, Influencer,
    InfluencerSummary, NewBooking, Profile, ProfileUpsert, ReferralStats, Role, TicketType,
    TicketTypeDraft,
};
use crate::utils::AppError;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_ticket_types(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
        ticket_types: &[TicketTypeDraft],
    ) -> StoreResult<()> {
        for tt in ticket_types {
            sqlx::query(
                "INSERT INTO ticket_types (event_id, name, price, description, sort_order) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(event_id)
            .bind(&tt.name)
            .bind(tt.price)
            .bind(&tt.description)
            .bind(tt.sort_order)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[derive(FromRow)]
struct InfluencerWithProfile {
    #[sqlx(flatten)]
    influencer: Influencer,
    full_name: Option<String>,
    profile_email: Option<String>,
}

fn unique_violation_to_conflict(err: sqlx::Error, what: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{} already exists", what))
        }
        _ => AppError::DatabaseError(err),
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn create_event(
        &self,
        draft: EventDraft,
        ticket_types: Vec<TicketTypeDraft>,
    ) -> StoreResult<Event> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (title, description, date, location, price, capacity, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.date)
        .bind(&draft.location)
        .bind(draft.price)
        .bind(draft.capacity)
        .bind(&draft.image_url)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_ticket_types(&mut tx, event.id, &ticket_types).await?;
        tx.commit().await?;

        tracing::info!(event_id = %event.id, ticket_types = ticket_types.len(), "Event created");
        Ok(event)
    }

    async fn update_event(
        &self,
        id: Uuid,
        draft: EventDraft,
        ticket_types: Vec<TicketTypeDraft>,
    ) -> StoreResult<Option<Event>> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            "UPDATE events SET title = $2, description = $3, date = $4, location = $5, \
             price = $6, capacity = $7, image_url = $8 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.date)
        .bind(&draft.location)
        .bind(draft.price)
        .bind(draft.capacity)
        .bind(&draft.image_url)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(event) = event else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM ticket_types WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_ticket_types(&mut tx, id, &ticket_types).await?;
        tx.commit().await?;

        Ok(Some(event))
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_ticket_types(&self, event_id: Uuid) -> StoreResult<Vec<TicketType>> {
        let types = sqlx::query_as::<_, TicketType>(
            "SELECT * FROM ticket_types WHERE event_id = $1 ORDER BY sort_order ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }

    async fn get_ticket_type(&self, id: Uuid) -> StoreResult<Option<TicketType>> {
        let tt = sqlx::query_as::<_, TicketType>("SELECT * FROM ticket_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tt)
    }

    async fn list_featured(&self) -> StoreResult<Vec<FeaturedEvent>> {
        let featured = sqlx::query_as::<_, FeaturedEvent>(
            "SELECT * FROM featured_events ORDER BY display_order ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(featured)
    }

    async fn toggle_featured(&self, event_id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM featured_events WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                "INSERT INTO featured_events (event_id, display_order) \
                 SELECT $1, COALESCE(MAX(display_order), 0) + 1 FROM featured_events",
            )
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed == 0)
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn insert_booking(&self, booking: NewBooking) -> StoreResult<Booking> {
        let row = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (event_id, ticket_type_id, quantity, customer_name, \
             customer_email, customer_phone, amount, status, razorpay_order_id, influencer_code) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(booking.event_id)
        .bind(booking.ticket_type_id)
        .bind(booking.quantity)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.customer_phone)
        .bind(booking.amount)
        .bind(booking.status.as_str())
        .bind(&booking.razorpay_order_id)
        .bind(&booking.influencer_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_bookings(&self) -> StoreResult<Vec<BookingSummary>> {
        let rows = sqlx::query_as::<_, BookingSummary>(
            "SELECT b.*, e.title AS event_title FROM bookings b \
             LEFT JOIN events e ON e.id = b.event_id ORDER BY b.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_booking(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_paid(&self, order_id: &str, payment_id: &str) -> StoreResult<MarkPaid> {
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'paid', razorpay_payment_id = $2 \
             WHERE razorpay_order_id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(order_id)
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(booking) = updated {
            return Ok(MarkPaid::Updated(booking));
        }

        let existing = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE razorpay_order_id = $1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match existing {
            Some(booking) => MarkPaid::Unchanged(booking),
            None => MarkPaid::NotFound,
        })
    }

    async fn claim_confirmation_email(&self, booking_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET email_sent_at = now() \
             WHERE id = $1 AND email_sent_at IS NULL",
        )
        .bind(booking_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn release_confirmation_email(&self, booking_id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE bookings SET email_sent_at = NULL WHERE id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn referral_stats(&self, code: &str) -> StoreResult<ReferralStats> {
        let stats = sqlx::query_as::<_, ReferralStats>(
            "SELECT COUNT(*) AS referred_bookings, \
             COUNT(*) FILTER (WHERE status = 'paid') AS paid_bookings, \
             COALESCE(SUM(amount) FILTER (WHERE status = 'paid'), 0) AS paid_revenue \
             FROM bookings WHERE influencer_code = $1",
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}

#[async_trait]
impl InfluencerStore for PgStore {
    async fn find_active_influencer(&self, code: &str) -> StoreResult<Option<Influencer>> {
        let row = sqlx::query_as::<_, Influencer>(
            "SELECT * FROM influencers WHERE code = $1 AND active = true",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_influencer(&self, id: Uuid) -> StoreResult<Option<Influencer>> {
        let row = sqlx::query_as::<_, Influencer>("SELECT * FROM influencers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_active_influencers(&self) -> StoreResult<Vec<InfluencerSummary>> {
        let rows = sqlx::query_as::<_, InfluencerWithProfile>(
            "SELECT i.*, p.full_name, p.email AS profile_email FROM influencers i \
             LEFT JOIN profiles p ON p.id = i.id \
             WHERE i.active = true ORDER BY i.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                InfluencerSummary::new(
                    &row.influencer,
                    row.full_name.as_deref(),
                    row.profile_email.as_deref(),
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
        sqlx::query_as::<_, Influencer>(
            "INSERT INTO influencers (id, email, code, discount_percent, active) \
             VALUES ($1, $2, $3, $4, true) \
             ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, code = EXCLUDED.code, \
             discount_percent = EXCLUDED.discount_percent, active = true \
             RETURNING *",
        )
        .bind(id)
        .bind(email)
        .bind(code)
        .bind(discount_percent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_to_conflict(e, "referral code"))
    }

    async fn deactivate_influencer(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE influencers SET active = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn upsert_otp(
        &self,
        email: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO email_verifications (email, otp, expires_at, created_at) \
             VALUES ($1, $2, $3, now()) \
             ON CONFLICT (email) DO UPDATE SET otp = EXCLUDED.otp, \
             expires_at = EXCLUDED.expires_at, created_at = EXCLUDED.created_at",
        )
        .bind(email)
        .bind(otp)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn consume_otp(&self, email: &str, otp: &str, now: DateTime<Utc>) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM email_verifications WHERE email = $1 AND otp = $2 AND expires_at > $3",
        )
        .bind(email)
        .bind(otp)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get_profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE lower(email) = lower($1) LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_profile(&self, profile: ProfileUpsert) -> StoreResult<Profile> {
        let row = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, email, full_name, role, email_verified) \
             VALUES ($1, $2, $3, $4, true) \
             ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, \
             full_name = EXCLUDED.full_name, email_verified = true, updated_at = now(), \
             role = CASE WHEN profiles.role IN ('admin', 'influencer') \
                    THEN profiles.role ELSE EXCLUDED.role END \
             RETURNING *",
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(profile.role.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE profiles SET role = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(role.as_str())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_profiles_by_role(&self, role: Role) -> StoreResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE role = $1 ORDER BY updated_at DESC",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE profiles SET reset_token_hash = $2, reset_token_expires_at = $3, \
             updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        email: &str,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "UPDATE profiles SET reset_token_hash = NULL, reset_token_expires_at = NULL, \
             updated_at = now() \
             WHERE lower(email) = lower($1) AND reset_token_hash = $2 \
             AND reset_token_expires_at > $3 RETURNING id",
        )
        .bind(email)
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> StoreResult<ContactMessage> {
        let row = sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contact_messages (name, email, message, status) \
             VALUES ($1, $2, $3, 'new') RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
