mod common;

use axum::http::StatusCode;
use common::{at, create_client, create_salon, create_service, create_staff, get_account, parse_body, TestApp, OWNER};
use serde_json::json;

#[tokio::test]
async fn registration_creates_an_empty_account() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    let body = get_account(&app, &salon_id, &client_id).await;
    assert_eq!(body["account"]["balance"], 0);
    assert_eq!(body["account"]["lifetime_earned"], 0);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/clients", salon_id),
            Some(OWNER),
            Some(json!({ "name": "Alice Again", "email": "alice@example.com" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn positive_adjustment_is_a_milestone_credit() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/loyalty/adjust", salon_id),
            Some(OWNER),
            Some(json!({ "client_id": client_id, "amount": 300, "reason": "Opening promo" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let account = parse_body(res).await;
    assert_eq!(account["balance"], 300);
    assert_eq!(account["lifetime_earned"], 300);

    let body = get_account(&app, &salon_id, &client_id).await;
    let txs = body["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0]["tx_type"], "milestone");
    assert_eq!(txs[0]["amount"], 300);
    assert_eq!(txs[0]["description"], "Admin adjustment: Opening promo");
}

#[tokio::test]
async fn negative_adjustment_never_touches_lifetime_earned() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    app.request(
        "POST",
        &format!("/api/v1/{}/loyalty/adjust", salon_id),
        Some(OWNER),
        Some(json!({ "client_id": client_id, "amount": 300, "reason": "Opening promo" })),
    )
    .await;

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/loyalty/adjust", salon_id),
            Some(OWNER),
            Some(json!({ "client_id": client_id, "amount": -100, "reason": "Entry error" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let account = parse_body(res).await;
    assert_eq!(account["balance"], 200);
    assert_eq!(account["lifetime_earned"], 300);

    let body = get_account(&app, &salon_id, &client_id).await;
    let txs = body["transactions"].as_array().unwrap();
    let expired = txs.iter().find(|t| t["tx_type"] == "expired").unwrap();
    assert_eq!(expired["amount"], -100);
}

#[tokio::test]
async fn adjustment_below_zero_is_rejected() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    app.request(
        "POST",
        &format!("/api/v1/{}/loyalty/adjust", salon_id),
        Some(OWNER),
        Some(json!({ "client_id": client_id, "amount": 50, "reason": "Promo" })),
    )
    .await;

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/loyalty/adjust", salon_id),
            Some(OWNER),
            Some(json!({ "client_id": client_id, "amount": -80, "reason": "Oops" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    // The guarded debit failure surfaces as a validation error, not as the
    // raw balance message.
    assert_eq!(parse_body(res).await["error"], "Cannot reduce balance below zero.");

    let body = get_account(&app, &salon_id, &client_id).await;
    assert_eq!(body["account"]["balance"], 50);
    let txs = body["transactions"].as_array().unwrap();
    assert!(txs.iter().all(|t| t["tx_type"] != "expired"));
}

#[tokio::test]
async fn adjustment_requires_a_reason_and_nonzero_amount() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/loyalty/adjust", salon_id),
            Some(OWNER),
            Some(json!({ "client_id": client_id, "amount": 100, "reason": "   " })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/loyalty/adjust", salon_id),
            Some(OWNER),
            Some(json!({ "client_id": client_id, "amount": 0, "reason": "No-op" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_redemption_ignores_the_minimum() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    app.request(
        "POST",
        &format!("/api/v1/{}/loyalty/adjust", salon_id),
        Some(OWNER),
        Some(json!({ "client_id": client_id, "amount": 400, "reason": "Promo" })),
    )
    .await;

    // 100 is below the default min_redeem of 500, which only binds bookings.
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/loyalty/redeem", salon_id),
            Some(OWNER),
            Some(json!({ "client_id": client_id, "points": 100 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let account = parse_body(res).await;
    assert_eq!(account["balance"], 300);
    assert_eq!(account["lifetime_earned"], 400);

    let body = get_account(&app, &salon_id, &client_id).await;
    let txs = body["transactions"].as_array().unwrap();
    let redeemed = txs.iter().find(|t| t["tx_type"] == "redeemed").unwrap();
    assert_eq!(redeemed["amount"], -100);
    assert_eq!(redeemed["description"], "Redeemed in salon by admin");
}

#[tokio::test]
async fn insufficient_redemption_reports_the_balance() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    app.request(
        "POST",
        &format!("/api/v1/{}/loyalty/adjust", salon_id),
        Some(OWNER),
        Some(json!({ "client_id": client_id, "amount": 120, "reason": "Promo" })),
    )
    .await;

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/loyalty/redeem", salon_id),
            Some(OWNER),
            Some(json!({ "client_id": client_id, "points": 500 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("500") && message.contains("120"), "got: {}", message);
}

#[tokio::test]
async fn transaction_amounts_sum_to_the_balance() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;

    for (amount, reason) in [(500i64, "Promo"), (-150, "Correction"), (80, "Review bonus")] {
        let res = app
            .request(
                "POST",
                &format!("/api/v1/{}/loyalty/adjust", salon_id),
                Some(OWNER),
                Some(json!({ "client_id": client_id, "amount": amount, "reason": reason })),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    app.request(
        "POST",
        &format!("/api/v1/{}/loyalty/redeem", salon_id),
        Some(OWNER),
        Some(json!({ "client_id": client_id, "points": 200 })),
    )
    .await;

    let body = get_account(&app, &salon_id, &client_id).await;
    let balance = body["account"]["balance"].as_i64().unwrap();
    let sum: i64 = body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["amount"].as_i64().unwrap())
        .sum();
    assert_eq!(sum, balance);
    assert_eq!(balance, 230);
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;

    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/loyalty/accounts/nobody", salon_id),
            Some(OWNER),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clients_see_only_their_own_account() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let alice = create_client(&app, &salon_id, "Alice", "alice@example.com").await;
    let bob = create_client(&app, &salon_id, "Bob", "bob@example.com").await;

    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/loyalty/accounts/{}", salon_id, alice),
            Some((&bob, "client")),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/loyalty/accounts/{}", salon_id, alice),
            Some((&alice, "client")),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn config_roundtrip_and_role_checks() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;

    let res = app
        .request("GET", &format!("/api/v1/{}/loyalty/config", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let config = parse_body(res).await;
    assert_eq!(config["points_per_unit"], 1);
    assert_eq!(config["currency_unit_amount"], 10);
    assert_eq!(config["min_redeem"], 500);

    // Staff may read but not write.
    let res = app
        .request(
            "PUT",
            &format!("/api/v1/{}/loyalty/config", salon_id),
            Some(("staff-1", "staff")),
            Some(json!({ "min_redeem": 100 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .request(
            "PUT",
            &format!("/api/v1/{}/loyalty/config", salon_id),
            Some(OWNER),
            Some(json!({ "min_redeem": 100, "birthday_bonus": 250 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["min_redeem"], 100);
    assert_eq!(updated["birthday_bonus"], 250);
    // Untouched fields keep their values.
    assert_eq!(updated["rebooking_bonus"], 50);

    let res = app
        .request(
            "PUT",
            &format!("/api/v1/{}/loyalty/config", salon_id),
            Some(OWNER),
            Some(json!({ "currency_unit_amount": 0 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_redemption_enforces_minimum_and_debits_atomically() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;
    let service_id = create_service(&app, &salon_id, "Deep Tissue", 750, 60).await;
    let staff_id = create_staff(&app, &salon_id, "Mara", "mara@example.com", &[&service_id]).await;

    app.request(
        "POST",
        &format!("/api/v1/{}/loyalty/adjust", salon_id),
        Some(OWNER),
        Some(json!({ "client_id": client_id, "amount": 600, "reason": "Promo" })),
    )
    .await;

    // Below the 500-point booking minimum.
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/appointments", salon_id),
            Some(OWNER),
            Some(json!({
                "client_id": client_id,
                "staff_id": staff_id,
                "service_id": service_id,
                "start_at": at(7, 10, 0),
                "points_to_redeem": 100
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // More than the balance: rejected, and no appointment must survive.
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/appointments", salon_id),
            Some(OWNER),
            Some(json!({
                "client_id": client_id,
                "staff_id": staff_id,
                "service_id": service_id,
                "start_at": at(7, 10, 0),
                "points_to_redeem": 700
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = get_account(&app, &salon_id, &client_id).await;
    assert_eq!(body["account"]["balance"], 600);
    let res = app
        .request("GET", &format!("/api/v1/{}/appointments", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 0);

    // A valid redemption books and debits in one step.
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/appointments", salon_id),
            Some(OWNER),
            Some(json!({
                "client_id": client_id,
                "staff_id": staff_id,
                "service_id": service_id,
                "start_at": at(7, 10, 0),
                "points_to_redeem": 500
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let appointment = parse_body(res).await;
    assert_eq!(appointment["points_redeemed"], 500);

    let body = get_account(&app, &salon_id, &client_id).await;
    assert_eq!(body["account"]["balance"], 100);
    let txs = body["transactions"].as_array().unwrap();
    let redeemed = txs.iter().find(|t| t["tx_type"] == "redeemed").unwrap();
    assert_eq!(redeemed["appointment_id"], appointment["id"]);
}
