//! Tests for health, public event listings and notification endpoints

mod common;

use common::{create_test_app, with_bearer, ADMIN_EMAIL};
use serde_json::{json, Value};
use ticketing_server::store::{BookingStore, EventStore};
use uuid::Uuid;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["service"], "ticketing-api");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = create_test_app();
    let response = app.server.get("/health").await;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
    assert!(headers.get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_legacy_event_detail_has_general_admission() {
    let app = create_test_app();
    let (event, _) = app.seed_event(450, &[]).await;

    let response = app.server.get(&format!("/api/events/{}", event.id)).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let options = body["data"]["ticket_types"].as_array().unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0]["name"], "General Admission");
    assert!(options[0]["id"].is_null());
    assert_eq!(body["data"]["min_price"], body["data"]["max_price"]);
}

#[tokio::test]
async fn test_event_detail_price_range() {
    let app = create_test_app();
    let (event, _) = app.seed_event(0, &[1200, 400, 800]).await;

    let body: Value = app
        .server
        .get(&format!("/api/events/{}", event.id))
        .await
        .json();
    assert_eq!(body["data"]["min_price"], 400.0);
    assert_eq!(body["data"]["max_price"], 1200.0);
    assert_eq!(body["data"]["ticket_types"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_event_detail_is_not_found() {
    let app = create_test_app();
    let response = app
        .server
        .get(&format!("/api/events/{}", Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_featured_events_follow_display_order() {
    let app = create_test_app();
    let (first, _) = app.seed_event(100, &[]).await;
    let (second, _) = app.seed_event(200, &[]).await;
    app.seed_event(300, &[]).await;
    app.store.toggle_featured(second.id).await.unwrap();
    app.store.toggle_featured(first.id).await.unwrap();

    let body: Value = app.server.get("/api/events/featured").await.json();
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.id.to_string(), first.id.to_string()]);

    let all: Value = app.server.get("/api/events").await.json();
    assert_eq!(all["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_contact_stores_message_and_notifies_admin() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/contact")
        .json(&json!({ "name": "Neha", "email": "neha@example.com", "message": "Group booking?" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "Message sent successfully");
    assert_eq!(app.store.contact_messages().await.len(), 1);

    app.mailer.wait_for(1).await;
    assert_eq!(app.mailer.sent_to(ADMIN_EMAIL).len(), 1);
}

#[tokio::test]
async fn test_contact_requires_all_fields() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/contact")
        .json(&json!({ "name": "Neha", "email": "neha@example.com" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert!(app.store.contact_messages().await.is_empty());
}

#[tokio::test]
async fn test_send_booking_email() {
    let app = create_test_app();
    let (event, _) = app.seed_event(600, &[]).await;
    let body: Value = app
        .server
        .post("/api/create-razorpay-order")
        .json(&json!({
            "eventId": event.id,
            "customerDetails": { "name": "Arjun", "email": "arjun@example.com" },
        }))
        .await
        .json();
    let booking_id = body["bookingId"].as_str().unwrap().to_string();
    let order_id = body["orderId"].as_str().unwrap().to_string();

    let unpaid = app
        .server
        .post("/api/send-booking-email")
        .json(&json!({ "bookingId": booking_id }))
        .await;
    assert_eq!(unpaid.status_code(), 400);

    app.store.mark_paid(&order_id, "pay_1").await.unwrap();
    let response = app
        .server
        .post("/api/send-booking-email")
        .json(&json!({ "bookingId": booking_id }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "Email sent");
    assert!(body["id"].as_str().unwrap().starts_with("msg_"));
    assert!(app.mailer.sent_to("arjun@example.com")[0]
        .html
        .contains("resend"));

    let missing = app
        .server
        .post("/api/send-booking-email")
        .json(&json!({ "bookingId": Uuid::new_v4() }))
        .await;
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn test_admin_can_send_approval_email() {
    let app = create_test_app();
    let token = app.seed_admin().await;

    let response = with_bearer(app.server.post("/api/send-approval-email"), &token)
        .json(&json!({
            "email": "creator@example.com",
            "name": "Creator",
            "status": "approved",
            "code": "CREA123456"
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let mail = &app.mailer.sent_to("creator@example.com")[0];
    assert!(mail.html.contains("CREA123456"));

    let bad = with_bearer(app.server.post("/api/send-approval-email"), &token)
        .json(&json!({ "email": "creator@example.com", "status": "maybe" }))
        .await;
    assert_eq!(bad.status_code(), 400);
}
