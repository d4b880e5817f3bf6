//! Tests for the admin and influencer dashboards and referral codes

mod common;

use common::{create_test_app, with_bearer};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use ticketing_server::models::Role;
use ticketing_server::store::{AccountStore, EventStore, InfluencerStore};
use uuid::Uuid;

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = create_test_app();
    let response = app.server.get("/api/admin/sections/events").await;
    assert_eq!(response.status_code(), 401);

    let response = with_bearer(app.server.get("/api/admin/sections/events"), "bogus").await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_admin_routes_reject_other_roles() {
    let app = create_test_app();
    let (_, token) = app.seed_profile("fan@example.com", "Fan", Role::User).await;

    let response = with_bearer(app.server.get("/api/admin/sections/bookings"), &token).await;
    assert_eq!(response.status_code(), 403);

    let response = with_bearer(app.server.post("/api/send-approval-email"), &token)
        .json(&json!({ "email": "a@example.com", "status": "approved" }))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_sections_view() {
    let app = create_test_app();
    let token = app.seed_admin().await;
    let (event, _) = app.seed_event(500, &[500, 900]).await;
    app.store.toggle_featured(event.id).await.unwrap();

    let response = with_bearer(app.server.get("/api/admin/sections/events"), &token).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["section"], "events");
    let rows = body["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["featured"], true);
    assert_eq!(rows[0]["ticket_types"].as_array().unwrap().len(), 2);

    let response = with_bearer(app.server.get("/api/admin/sections/unknown"), &token).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_create_update_and_delete_event() {
    let app = create_test_app();
    let token = app.seed_admin().await;

    let response = with_bearer(app.server.post("/api/admin/events"), &token)
        .json(&json!({
            "title": "Comedy Night",
            "date": "2030-01-15T19:30:00Z",
            "location": "Bengaluru",
            "ticketTypes": [
                { "name": "Standard", "price": 799 },
                { "name": "Front Row", "price": 1299 }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let event_id: Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();

    let event = app.store.get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.price, Decimal::from(799));
    assert_eq!(app.store.list_ticket_types(event_id).await.unwrap().len(), 2);

    let response = with_bearer(app.server.put(&format!("/api/admin/events/{}", event_id)), &token)
        .json(&json!({
            "title": "Comedy Night Live",
            "date": "2030-01-15T19:30:00Z",
            "location": "Bengaluru",
            "ticketTypes": [{ "name": "Standard", "price": 999 }]
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let types = app.store.list_ticket_types(event_id).await.unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].price, Decimal::from(999));

    let response =
        with_bearer(app.server.delete(&format!("/api/admin/events/{}", event_id)), &token).await;
    assert_eq!(response.status_code(), 200);
    assert!(app.store.get_event(event_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_event_without_ticket_types_is_rejected() {
    let app = create_test_app();
    let token = app.seed_admin().await;

    let response = with_bearer(app.server.post("/api/admin/events"), &token)
        .json(&json!({
            "title": "Empty",
            "date": "2030-01-15T19:30:00Z",
            "location": "Delhi",
            "ticketTypes": []
        }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_toggle_featured() {
    let app = create_test_app();
    let token = app.seed_admin().await;
    let (event, _) = app.seed_event(100, &[]).await;
    let path = format!("/api/admin/events/{}/featured", event.id);

    let body: Value = with_bearer(app.server.post(&path), &token).await.json();
    assert_eq!(body["data"]["featured"], true);
    let body: Value = with_bearer(app.server.post(&path), &token).await.json();
    assert_eq!(body["data"]["featured"], false);

    let missing = format!("/api/admin/events/{}/featured", Uuid::new_v4());
    assert_eq!(with_bearer(app.server.post(&missing), &token).await.status_code(), 404);
}

#[tokio::test]
async fn test_approval_flow_issues_working_code() {
    let app = create_test_app();
    let token = app.seed_admin().await;
    let (applicant, applicant_token) = app
        .seed_profile("asha@example.com", "Asha Rao", Role::PendingInfluencer)
        .await;

    let body: Value = with_bearer(app.server.get("/api/admin/sections/approvals"), &token)
        .await
        .json();
    assert_eq!(body["data"]["rows"][0]["id"], applicant.id.to_string());

    let pending: Value = with_bearer(app.server.get("/api/influencer/me"), &applicant_token)
        .await
        .json();
    assert_eq!(pending["data"]["status"], "pending");

    let response = with_bearer(
        app.server
            .post(&format!("/api/admin/approvals/{}/approve", applicant.id)),
        &token,
    )
    .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let code = body["data"]["code"].as_str().unwrap().to_string();
    assert!(code.starts_with("ASHA"));
    assert_eq!(code.len(), 10);

    let profile = app.store.get_profile(applicant.id).await.unwrap().unwrap();
    assert_eq!(profile.role, Role::Influencer);

    let response = app
        .server
        .post("/api/validate-code")
        .json(&json!({ "code": code }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["valid"], true);
    assert_eq!(body["discountPercent"], 10.0);

    app.mailer.wait_for(1).await;
    let mails = app.mailer.sent_to("asha@example.com");
    assert_eq!(mails.len(), 1);
    assert!(mails[0].html.contains(&code));

    let dashboard: Value = with_bearer(app.server.get("/api/influencer/me"), &applicant_token)
        .await
        .json();
    assert_eq!(dashboard["data"]["status"], "active");
    assert_eq!(dashboard["data"]["code"], code);
    assert_eq!(dashboard["data"]["referredBookings"], 0);
}

#[tokio::test]
async fn test_approve_requires_pending_application() {
    let app = create_test_app();
    let token = app.seed_admin().await;
    let (user, _) = app.seed_profile("plain@example.com", "Plain", Role::User).await;

    let response = with_bearer(
        app.server.post(&format!("/api/admin/approvals/{}/approve", user.id)),
        &token,
    )
    .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_reject_application() {
    let app = create_test_app();
    let token = app.seed_admin().await;
    let (applicant, _) = app
        .seed_profile("no@example.com", "Nope", Role::PendingInfluencer)
        .await;

    let response = with_bearer(
        app.server
            .post(&format!("/api/admin/approvals/{}/reject", applicant.id)),
        &token,
    )
    .await;
    assert_eq!(response.status_code(), 200);

    let profile = app.store.get_profile(applicant.id).await.unwrap().unwrap();
    assert_eq!(profile.role, Role::User);
    app.mailer.wait_for(1).await;
    assert_eq!(
        app.mailer.sent_to("no@example.com")[0].subject,
        "Update on your Influencer Application"
    );
}

#[tokio::test]
async fn test_revoked_code_stops_validating() {
    let app = create_test_app();
    let token = app.seed_admin().await;
    let (influencer, _) = app.seed_influencer("PROMO12345", 15).await;

    let ok = app
        .server
        .post("/api/validate-code")
        .json(&json!({ "code": "PROMO12345" }))
        .await;
    assert_eq!(ok.status_code(), 200);

    let response = with_bearer(
        app.server
            .delete(&format!("/api/admin/influencers/{}", influencer.id)),
        &token,
    )
    .await;
    assert_eq!(response.status_code(), 200);

    let revoked = app
        .server
        .post("/api/validate-code")
        .json(&json!({ "code": "PROMO12345" }))
        .await;
    assert_eq!(revoked.status_code(), 404);

    let stored = app.store.get_influencer(influencer.id).await.unwrap().unwrap();
    assert!(!stored.active);
    let profile = app.store.get_profile(influencer.id).await.unwrap().unwrap();
    assert_eq!(profile.role, Role::User);
}

#[tokio::test]
async fn test_validate_code_unknown_and_empty() {
    let app = create_test_app();
    let unknown = app
        .server
        .post("/api/validate-code")
        .json(&json!({ "code": "NOSUCHCODE" }))
        .await;
    assert_eq!(unknown.status_code(), 404);

    let empty = app
        .server
        .post("/api/validate-code")
        .json(&json!({ "code": "" }))
        .await;
    assert_eq!(empty.status_code(), 400);
}

#[tokio::test]
async fn test_delete_booking() {
    let app = create_test_app();
    let token = app.seed_admin().await;
    let (event, _) = app.seed_event(300, &[]).await;
    let body: Value = app
        .server
        .post("/api/create-razorpay-order")
        .json(&json!({
            "eventId": event.id,
            "customerDetails": { "name": "Kiran", "email": "kiran@example.com" },
        }))
        .await
        .json();
    let booking_id = body["bookingId"].as_str().unwrap().to_string();

    let listing: Value = with_bearer(app.server.get("/api/admin/sections/bookings"), &token)
        .await
        .json();
    assert_eq!(listing["data"]["rows"][0]["event_title"], "Sunset Sessions");

    let path = format!("/api/admin/bookings/{}", booking_id);
    assert_eq!(with_bearer(app.server.delete(&path), &token).await.status_code(), 200);
    assert_eq!(with_bearer(app.server.delete(&path), &token).await.status_code(), 404);
}
