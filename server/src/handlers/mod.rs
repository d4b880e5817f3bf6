use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

pub mod admin;
pub mod auth;
mod confirmation;
pub mod discount;
pub mod events;
pub mod influencer;
pub mod notifications;
pub mod orders;
pub mod password;
pub mod webhook;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "ticketing-api",
    };

    success(payload, "Health check successful").into_response()
}
