use std::env;

use rust_decimal::Decimal;
use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_SITE_URL: &str = "http://localhost:5173";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Credentials for the hosted database/auth project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_role_key: String,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// `None` selects the console sender.
    pub resend_api_key: Option<String>,
    /// Display name used in sender addresses and subjects.
    pub brand_name: String,
    pub from_domain: String,
    pub admin_notify_email: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub production: bool,
    pub site_url: String,
    pub cors_allowed_origins: Option<String>,
    pub default_influencer_discount: Decimal,
    pub supabase: SupabaseConfig,
    pub razorpay: RazorpayConfig,
    pub email: EmailConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match optional("PORT") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: "PORT",
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_PORT,
        };

        let default_influencer_discount = match optional("DEFAULT_INFLUENCER_DISCOUNT") {
            Some(raw) => parse_percent(&raw).ok_or(ConfigError::Invalid {
                name: "DEFAULT_INFLUENCER_DISCOUNT",
                reason: format!("'{}' is not a percentage between 0 and 100", raw),
            })?,
            None => Decimal::from(10),
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port,
            production: optional("RUST_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            site_url: optional("SITE_URL")
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            cors_allowed_origins: optional("CORS_ALLOWED_ORIGINS"),
            default_influencer_discount,
            supabase: SupabaseConfig {
                url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
                service_role_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
            },
            razorpay: RazorpayConfig {
                key_id: required("RAZORPAY_KEY_ID")?,
                key_secret: required("RAZORPAY_KEY_SECRET")?,
                webhook_secret: required("RAZORPAY_WEBHOOK_SECRET")?,
                currency: optional("CURRENCY").unwrap_or_else(|| "INR".to_string()),
            },
            email: EmailConfig {
                resend_api_key: optional("RESEND_API_KEY"),
                brand_name: optional("BRAND_NAME").unwrap_or_else(|| "SK Events".to_string()),
                from_domain: optional("EMAIL_FROM_DOMAIN")
                    .unwrap_or_else(|| "contact.sk-events.com".to_string()),
                admin_notify_email: optional("ADMIN_NOTIFY_EMAIL")
                    .unwrap_or_else(|| "admin@localhost".to_string()),
            },
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn parse_percent(raw: &str) -> Option<Decimal> {
    let value: Decimal = raw.trim().parse().ok()?;
    (value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED).then_some(value)
}
