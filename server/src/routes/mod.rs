use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{
    admin, auth, discount, events, health_check, influencer, notifications, orders, password,
    webhook,
};
use crate::state::AppState;

fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/create-razorpay-order", post(orders::create_order))
        .route("/razorpay-webhook", post(webhook::razorpay_webhook))
        .route("/validate-code", post(discount::validate_code))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/send-otp", post(auth::send_otp))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/forgot-password", post(password::forgot_password))
        .route("/reset-password", post(password::reset_password))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(notifications::contact))
        .route("/send-approval-email", post(notifications::send_approval_email))
        .route("/send-booking-email", post(notifications::send_booking_email))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/sections/:section", get(admin::get_section))
        .route("/events", post(admin::create_event))
        .route(
            "/events/:id",
            delete(admin::delete_event).put(admin::update_event),
        )
        .route("/events/:id/featured", post(admin::toggle_featured))
        .route("/bookings/:id", delete(admin::delete_booking))
        .route("/influencers/:id", delete(admin::revoke_influencer))
        .route("/approvals/:id/approve", post(admin::approve_application))
        .route("/approvals/:id/reject", post(admin::reject_application))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_events))
        .route("/events/featured", get(events::list_featured))
        .route("/events/:id", get(events::get_event))
        .route("/influencer/me", get(influencer::dashboard))
}

pub fn create_routes(state: AppState) -> Router {
    let production = state.config.production;
    let cors = create_cors_layer(state.config.cors_allowed_origins.as_deref());

    let api = Router::new()
        .merge(checkout_routes())
        .merge(notification_routes())
        .merge(public_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(production))
        .layer(cors)
}
