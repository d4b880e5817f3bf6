//! Shared fixtures for the HTTP integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;
use uuid::Uuid;

use ticketing_server::auth_admin::{AuthAdmin, AuthAdminError};
use ticketing_server::config::{Config, EmailConfig, RazorpayConfig, SupabaseConfig};
use ticketing_server::email::{EmailError, EmailSender, OutgoingEmail};
use ticketing_server::gateway::{GatewayError, GatewayOrder, OrderRequest, PaymentGateway};
use ticketing_server::models::{Event, EventDraft, Profile, Role, TicketType, TicketTypeDraft};
use ticketing_server::store::{EventStore, InMemoryStore, InfluencerStore};
use ticketing_server::{create_routes, AppState};

pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const KEY_ID: &str = "rzp_test_key";
pub const SITE_URL: &str = "https://tickets.test";
pub const ADMIN_EMAIL: &str = "ops@tickets.test";

/// Records order requests and hands out sequential order ids.
#[derive(Default, Clone)]
pub struct MockGateway {
    pub orders: Arc<RwLock<Vec<OrderRequest>>>,
    pub fail: Arc<AtomicBool>,
}

impl MockGateway {
    pub fn order_count(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    pub fn last_order(&self) -> Option<OrderRequest> {
        self.orders.read().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected {
                status: 500,
                body: "gateway down".to_string(),
            });
        }
        let mut orders = self.orders.write().unwrap();
        orders.push(request.clone());
        Ok(GatewayOrder {
            id: format!("order_test_{}", orders.len()),
            amount: request.amount,
            currency: request.currency,
        })
    }

    fn key_id(&self) -> &str {
        KEY_ID
    }
}

/// Accounts keyed by email plus access tokens mapping to user ids.
#[derive(Default, Clone)]
pub struct MockAuthAdmin {
    pub users: Arc<RwLock<HashMap<String, (Uuid, String)>>>,
    pub tokens: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl MockAuthAdmin {
    pub fn password_of(&self, email: &str) -> Option<String> {
        self.users
            .read()
            .unwrap()
            .get(email)
            .map(|(_, password)| password.clone())
    }

    pub fn user_id(&self, email: &str) -> Option<Uuid> {
        self.users.read().unwrap().get(email).map(|(id, _)| *id)
    }

    pub fn issue_token(&self, user_id: Uuid) -> String {
        let token = format!("token_{}", Uuid::new_v4().simple());
        self.tokens.write().unwrap().insert(token.clone(), user_id);
        token
    }
}

#[async_trait]
impl AuthAdmin for MockAuthAdmin {
    async fn create_user(&self, email: &str, password: &str) -> Result<Uuid, AuthAdminError> {
        let mut users = self.users.write().unwrap();
        if users.contains_key(email) {
            return Err(AuthAdminError::AlreadyExists);
        }
        let id = Uuid::new_v4();
        users.insert(email.to_string(), (id, password.to_string()));
        Ok(id)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>, AuthAdminError> {
        Ok(self.user_id(email))
    }

    async fn update_password(&self, user_id: Uuid, password: &str) -> Result<(), AuthAdminError> {
        let mut users = self.users.write().unwrap();
        let entry = users
            .values_mut()
            .find(|(id, _)| *id == user_id)
            .ok_or(AuthAdminError::NotFound)?;
        entry.1 = password.to_string();
        Ok(())
    }

    async fn generate_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<String, AuthAdminError> {
        Ok(format!(
            "https://auth.test/verify?email={}&redirect_to={}",
            email, redirect_to
        ))
    }

    async fn user_from_access_token(&self, token: &str) -> Result<Uuid, AuthAdminError> {
        self.tokens
            .read()
            .unwrap()
            .get(token)
            .copied()
            .ok_or(AuthAdminError::InvalidToken)
    }
}

/// Captures every message instead of sending it.
#[derive(Default, Clone)]
pub struct MockEmailSender {
    pub sent: Arc<RwLock<Vec<OutgoingEmail>>>,
    pub fail: Arc<AtomicBool>,
}

impl MockEmailSender {
    pub fn sent_to(&self, email: &str) -> Vec<OutgoingEmail> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.to.iter().any(|to| to == email))
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    /// The code inside the first `<strong>` of the last email to `email`.
    pub fn last_code(&self, email: &str) -> Option<String> {
        let mail = self.sent_to(email).pop()?;
        let start = mail.html.find("<strong>")? + "<strong>".len();
        let end = mail.html[start..].find("</strong>")? + start;
        Some(mail.html[start..end].to_string())
    }

    /// The raw reset token from the last reset link sent to `email`.
    pub fn last_reset_token(&self, email: &str) -> Option<String> {
        let mail = self.sent_to(email).pop()?;
        let start = mail.html.find("token=")? + "token=".len();
        let end = mail.html[start..].find('&')? + start;
        Some(mail.html[start..end].to_string())
    }

    /// Waits for emails sent from spawned tasks.
    pub async fn wait_for(&self, count: usize) {
        for _ in 0..200 {
            if self.count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::Rejected {
                status: 500,
                body: "provider down".to_string(),
            });
        }
        let mut sent = self.sent.write().unwrap();
        sent.push(email);
        Ok(format!("msg_{}", sent.len()))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        port: 0,
        production: false,
        site_url: SITE_URL.to_string(),
        cors_allowed_origins: None,
        default_influencer_discount: Decimal::from(10),
        supabase: SupabaseConfig {
            url: "https://auth.test".to_string(),
            service_role_key: "service-role".to_string(),
        },
        razorpay: RazorpayConfig {
            key_id: KEY_ID.to_string(),
            key_secret: "rzp_secret".to_string(),
            webhook_secret: WEBHOOK_SECRET.to_string(),
            currency: "INR".to_string(),
        },
        email: EmailConfig {
            resend_api_key: None,
            brand_name: "SK Events".to_string(),
            from_domain: "mail.tickets.test".to_string(),
            admin_notify_email: ADMIN_EMAIL.to_string(),
        },
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub gateway: MockGateway,
    pub auth: MockAuthAdmin,
    pub mailer: MockEmailSender,
}

pub fn create_test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let gateway = MockGateway::default();
    let auth = MockAuthAdmin::default();
    let mailer = MockEmailSender::default();

    let state = AppState::new(
        test_config(),
        store.clone(),
        Arc::new(gateway.clone()),
        Arc::new(auth.clone()),
        Arc::new(mailer.clone()),
    );

    let server = TestServer::new(create_routes(state)).expect("Failed to create test server");

    TestApp {
        server,
        store,
        gateway,
        auth,
        mailer,
    }
}

pub fn with_bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

pub fn signature_header(value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-razorpay-signature"),
        HeaderValue::from_str(value).unwrap(),
    )
}

/// Hex HMAC-SHA256 of `body`, as the gateway signs webhook deliveries.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

impl TestApp {
    /// Creates an event. Each price in `ticket_prices` becomes a ticket type.
    pub async fn seed_event(&self, price: i64, ticket_prices: &[i64]) -> (Event, Vec<TicketType>) {
        let draft = EventDraft {
            title: "Sunset Sessions".to_string(),
            description: Some("Live music".to_string()),
            date: Utc::now() + chrono::Duration::days(7),
            location: "Goa".to_string(),
            price: Decimal::from(price),
            capacity: 200,
            image_url: None,
        };
        let types = ticket_prices
            .iter()
            .enumerate()
            .map(|(i, p)| TicketTypeDraft {
                name: format!("Tier {}", i + 1),
                price: Decimal::from(*p),
                description: None,
                sort_order: i as i32,
            })
            .collect();
        let event = self.store.create_event(draft, types).await.unwrap();
        let types = self.store.list_ticket_types(event.id).await.unwrap();
        (event, types)
    }

    /// Inserts a profile with `role` and returns it with a valid access token.
    pub async fn seed_profile(&self, email: &str, name: &str, role: Role) -> (Profile, String) {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: Some(name.to_string()),
            role,
            email_verified: true,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        self.store.put_profile(profile.clone()).await;
        self.auth
            .users
            .write()
            .unwrap()
            .insert(email.to_string(), (profile.id, "original-password".to_string()));
        let token = self.auth.issue_token(profile.id);
        (profile, token)
    }

    pub async fn seed_admin(&self) -> String {
        self.seed_profile("admin@tickets.test", "Admin", Role::Admin)
            .await
            .1
    }

    /// An active influencer with its own profile.
    pub async fn seed_influencer(&self, code: &str, discount: i64) -> (Profile, String) {
        let (profile, token) = self
            .seed_profile(
                &format!("{}@promo.test", code.to_lowercase()),
                "Promo Person",
                Role::Influencer,
            )
            .await;
        self.store
            .insert_influencer(profile.id, Some(&profile.email), code, Decimal::from(discount))
            .await
            .unwrap();
        (profile, token)
    }
}
