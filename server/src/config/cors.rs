use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:4173";

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// Browser pages call the checkout, auth and dashboard endpoints from the site
/// origin; the gateway webhook is server-to-server and does not need CORS.
pub fn create_cors_layer(configured: Option<&str>) -> CorsLayer {
    let allowed_origins = parse_allowed_origins(configured.unwrap_or(DEFAULT_ALLOWED_ORIGINS));

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn parse_allowed_origins(origins_str: &str) -> AllowOrigin {
    let origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => {
                tracing::debug!(origin, "CORS: allowing origin");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(origin, error = %e, "CORS: ignoring invalid origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: no valid origins configured, allowing any origin");
        AllowOrigin::any()
    } else {
        tracing::info!("CORS: configured with {} allowed origin(s)", origins.len());
        AllowOrigin::list(origins)
    }
}
