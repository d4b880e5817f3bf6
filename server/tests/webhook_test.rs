//! Tests for the payment webhook

mod common;

use std::sync::atomic::Ordering;

use axum::body::Bytes;
use common::{create_test_app, sign, signature_header, TestApp, WEBHOOK_SECRET};
use serde_json::{json, Value};
use ticketing_server::models::BookingStatus;
use ticketing_server::store::BookingStore;
use uuid::Uuid;

/// Creates a pending booking through checkout and returns (booking id, order id).
async fn pending_booking(app: &TestApp) -> (Uuid, String) {
    let (event, _) = app.seed_event(750, &[]).await;
    let response = app
        .server
        .post("/api/create-razorpay-order")
        .json(&json!({
            "eventId": event.id,
            "customerDetails": { "name": "Meera", "email": "meera@example.com", "phone": "1" },
        }))
        .await;
    let body: Value = response.json();
    (
        body["bookingId"].as_str().unwrap().parse().unwrap(),
        body["orderId"].as_str().unwrap().to_string(),
    )
}

fn paid_payload(order_id: &str, payment_id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "entity": "event",
        "event": "order.paid",
        "payload": {
            "payment": { "entity": { "id": payment_id, "order_id": order_id, "amount": 75000 } },
            "order": { "entity": { "id": order_id } }
        }
    }))
    .unwrap()
}

async fn deliver(app: &TestApp, body: Vec<u8>, signature: &str) -> axum_test::TestResponse {
    let (name, value) = signature_header(signature);
    app.server
        .post("/api/razorpay-webhook")
        .add_header(name, value)
        .content_type("application/json")
        .bytes(Bytes::from(body))
        .await
}

#[tokio::test]
async fn test_invalid_signature_is_rejected() {
    let app = create_test_app();
    let (booking_id, order_id) = pending_booking(&app).await;
    let body = paid_payload(&order_id, "pay_1");

    let response = deliver(&app, body.clone(), &sign("wrong-secret", &body)).await;
    assert_eq!(response.status_code(), 400);

    let booking = app.store.get_booking(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/razorpay-webhook")
        .json(&json!({ "event": "order.paid" }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_order_paid_marks_booking_and_emails_once() {
    let app = create_test_app();
    let (booking_id, order_id) = pending_booking(&app).await;
    let body = paid_payload(&order_id, "pay_1");
    let signature = sign(WEBHOOK_SECRET, &body);

    let response = deliver(&app, body.clone(), &signature).await;
    assert_eq!(response.status_code(), 200);
    let ack: Value = response.json();
    assert_eq!(ack["status"], "ok");

    let booking = app.store.get_booking(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Paid);
    assert_eq!(booking.razorpay_payment_id.as_deref(), Some("pay_1"));
    assert!(booking.email_sent_at.is_some());
    assert_eq!(app.mailer.sent_to("meera@example.com").len(), 1);

    // Gateway retry of the same delivery.
    let response = deliver(&app, body, &signature).await;
    assert_eq!(response.status_code(), 200);

    let booking = app.store.get_booking(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Paid);
    assert_eq!(app.mailer.sent_to("meera@example.com").len(), 1);
}

#[tokio::test]
async fn test_failed_email_is_retried_on_next_delivery() {
    let app = create_test_app();
    let (booking_id, order_id) = pending_booking(&app).await;
    let body = paid_payload(&order_id, "pay_1");
    let signature = sign(WEBHOOK_SECRET, &body);

    app.mailer.fail.store(true, Ordering::SeqCst);
    let response = deliver(&app, body.clone(), &signature).await;
    assert_eq!(response.status_code(), 200);

    let booking = app.store.get_booking(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Paid);
    assert!(booking.email_sent_at.is_none());

    app.mailer.fail.store(false, Ordering::SeqCst);
    deliver(&app, body, &signature).await;
    assert_eq!(app.mailer.sent_to("meera@example.com").len(), 1);
}

#[tokio::test]
async fn test_unknown_order_is_acknowledged() {
    let app = create_test_app();
    let body = paid_payload("order_missing", "pay_1");
    let response = deliver(&app, body.clone(), &sign(WEBHOOK_SECRET, &body)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.mailer.count(), 0);
}

#[tokio::test]
async fn test_other_events_are_acknowledged_without_change() {
    let app = create_test_app();
    let (booking_id, order_id) = pending_booking(&app).await;
    let body = serde_json::to_vec(&json!({
        "event": "payment.failed",
        "payload": { "payment": { "entity": { "id": "pay_9", "order_id": order_id } } }
    }))
    .unwrap();

    let response = deliver(&app, body.clone(), &sign(WEBHOOK_SECRET, &body)).await;
    assert_eq!(response.status_code(), 200);

    let booking = app.store.get_booking(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
}
