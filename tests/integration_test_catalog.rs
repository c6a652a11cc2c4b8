mod common;

use axum::http::StatusCode;
use common::{at, create_client, create_salon, create_service, create_staff, parse_body, set_status, TestApp, OWNER};
use serde_json::json;

#[tokio::test]
async fn salon_creation_requires_owner_and_valid_timezone() {
    let app = TestApp::new().await;

    let res = app
        .request(
            "POST",
            "/api/v1/salons",
            Some(("staff-1", "staff")),
            Some(json!({ "name": "Willow Spa" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .request(
            "POST",
            "/api/v1/salons",
            Some(OWNER),
            Some(json!({ "name": "Willow Spa", "timezone": "Atlantis/Nowhere" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .request(
            "POST",
            "/api/v1/salons",
            Some(OWNER),
            Some(json!({ "name": "Willow Spa", "timezone": "Africa/Johannesburg" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let salon = parse_body(res).await;
    assert_eq!(salon["timezone"], "Africa/Johannesburg");

    let res = app
        .request(
            "GET",
            &format!("/api/v1/salons/{}", salon["id"].as_str().unwrap()),
            Some(OWNER),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn service_listing_hides_inactive_entries() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let keep = create_service(&app, &salon_id, "Facial", 500, 45).await;
    let retire = create_service(&app, &salon_id, "Mud Wrap", 650, 60).await;

    let res = app
        .request(
            "PUT",
            &format!("/api/v1/{}/services/{}", salon_id, retire),
            Some(OWNER),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .request("GET", &format!("/api/v1/{}/services", salon_id), Some(OWNER), None)
        .await;
    let list = parse_body(res).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"].as_str().unwrap(), keep);

    // The retired service stays addressable directly.
    let res = app
        .request("GET", &format!("/api/v1/{}/services/{}", salon_id, retire), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["is_active"], false);
}

#[tokio::test]
async fn service_validation() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/services", salon_id),
            Some(OWNER),
            Some(json!({ "name": "", "category": "massage", "duration_mins": 60, "price": 100 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/services", salon_id),
            Some(OWNER),
            Some(json!({ "name": "Facial", "category": "skin", "duration_mins": 0, "price": 100 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/services", salon_id),
            Some(OWNER),
            Some(json!({ "name": "Facial", "category": "skin", "duration_mins": 45, "price": -5 })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staff_listing_filters_by_capability() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let massage = create_service(&app, &salon_id, "Deep Tissue", 750, 60).await;
    let facial = create_service(&app, &salon_id, "Facial", 500, 45).await;

    let mara = create_staff(&app, &salon_id, "Mara", "mara@example.com", &[&massage, &facial]).await;
    let nadia = create_staff(&app, &salon_id, "Nadia", "nadia@example.com", &[&facial]).await;

    let res = app
        .request("GET", &format!("/api/v1/{}/staff", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);

    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/staff?service_id={}", salon_id, massage),
            Some(OWNER),
            None,
        )
        .await;
    let list = parse_body(res).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"].as_str().unwrap(), mara);
    assert_eq!(list[0]["name"], "Mara");

    // Capability set replacement changes the filter result.
    let res = app
        .request(
            "PUT",
            &format!("/api/v1/{}/staff/{}", salon_id, nadia),
            Some(OWNER),
            Some(json!({ "service_ids": [massage] })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/staff?service_id={}", salon_id, massage),
            Some(OWNER),
            None,
        )
        .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn availability_reports_hours_and_booked_slots() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;
    let service_id = create_service(&app, &salon_id, "Deep Tissue", 750, 60).await;
    let staff_id = create_staff(&app, &salon_id, "Mara", "mara@example.com", &[&service_id]).await;

    let start = at(7, 10, 0);
    app.request(
        "POST",
        &format!("/api/v1/{}/appointments", salon_id),
        Some(OWNER),
        Some(json!({
            "client_id": client_id,
            "staff_id": staff_id,
            "service_id": service_id,
            "start_at": start
        })),
    )
    .await;

    let date = (chrono::Utc::now().date_naive() + chrono::Duration::days(7)).format("%Y-%m-%d");
    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/staff/{}/availability?date={}", salon_id, staff_id, date),
            Some(OWNER),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["working_hours"]["mon"]["open"], "09:00");
    assert!(body["working_hours"]["sun"].is_null());
    let booked = body["booked"].as_array().unwrap();
    assert_eq!(booked.len(), 1);

    // A different day shows an empty calendar.
    let other_date = (chrono::Utc::now().date_naive() + chrono::Duration::days(8)).format("%Y-%m-%d");
    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/staff/{}/availability?date={}", salon_id, staff_id, other_date),
            Some(OWNER),
            None,
        )
        .await;
    let body = parse_body(res).await;
    assert_eq!(body["booked"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn client_search_matches_name_and_email() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    create_client(&app, &salon_id, "Alice Jones", "alice@example.com").await;
    create_client(&app, &salon_id, "Bob Smith", "bob@example.com").await;

    let res = app
        .request("GET", &format!("/api/v1/{}/clients?search=jones", salon_id), Some(OWNER), None)
        .await;
    let list = parse_body(res).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Alice Jones");

    let res = app
        .request("GET", &format!("/api/v1/{}/clients?search=bob@", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);

    let res = app
        .request("GET", &format!("/api/v1/{}/clients", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn client_profile_includes_account_and_history() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let client_id = create_client(&app, &salon_id, "Alice", "alice@example.com").await;
    let service_id = create_service(&app, &salon_id, "Deep Tissue", 750, 60).await;
    let staff_id = create_staff(&app, &salon_id, "Mara", "mara@example.com", &[&service_id]).await;

    app.request(
        "POST",
        &format!("/api/v1/{}/appointments", salon_id),
        Some(OWNER),
        Some(json!({
            "client_id": client_id,
            "staff_id": staff_id,
            "service_id": service_id,
            "start_at": at(7, 10, 0)
        })),
    )
    .await;

    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/clients/{}", salon_id, client_id),
            Some(OWNER),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["client"]["name"], "Alice");
    assert_eq!(body["account"]["balance"], 0);
    assert_eq!(body["appointments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn revenue_counts_only_completed_appointments() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let alice = create_client(&app, &salon_id, "Alice", "alice@example.com").await;
    let bob = create_client(&app, &salon_id, "Bob", "bob@example.com").await;
    let service_id = create_service(&app, &salon_id, "Deep Tissue", 750, 60).await;
    let staff_id = create_staff(&app, &salon_id, "Mara", "mara@example.com", &[&service_id]).await;

    for (client, hour) in [(&alice, 10), (&bob, 12)] {
        let res = app
            .request(
                "POST",
                &format!("/api/v1/{}/appointments", salon_id),
                Some(OWNER),
                Some(json!({
                    "client_id": client,
                    "staff_id": staff_id,
                    "service_id": service_id,
                    "start_at": at(7, hour, 0)
                })),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // Complete only Alice's visit. Bob's stays pending.
    let res = app
        .request("GET", &format!("/api/v1/{}/appointments?client_id={}", salon_id, alice), Some(OWNER), None)
        .await;
    let alice_appointments = parse_body(res).await;
    let id = alice_appointments[0]["id"].as_str().unwrap().to_string();
    set_status(&app, &salon_id, &id, "confirmed").await;
    set_status(&app, &salon_id, &id, "completed").await;

    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/revenue?period=month", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["total"], 750);
    assert_eq!(body["completed_count"], 1);
    assert_eq!(body["period"], "month");

    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/revenue?period=decade", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn points_economy_aggregates_accounts() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let alice = create_client(&app, &salon_id, "Alice", "alice@example.com").await;
    let _bob = create_client(&app, &salon_id, "Bob", "bob@example.com").await;

    app.request(
        "POST",
        &format!("/api/v1/{}/loyalty/adjust", salon_id),
        Some(OWNER),
        Some(json!({ "client_id": alice, "amount": 500, "reason": "Promo" })),
    )
    .await;
    app.request(
        "POST",
        &format!("/api/v1/{}/loyalty/redeem", salon_id),
        Some(OWNER),
        Some(json!({ "client_id": alice, "points": 200 })),
    )
    .await;

    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/points", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["total_issued"], 500);
    assert_eq!(body["total_outstanding"], 300);
    assert_eq!(body["total_redeemed"], 200);
    assert_eq!(body["member_count"], 2);
}

async fn book(app: &TestApp, salon_id: &str, client: &str, staff: &str, service: &str, start: String) -> String {
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/appointments", salon_id),
            Some(OWNER),
            Some(json!({
                "client_id": client,
                "staff_id": staff,
                "service_id": service,
                "start_at": start
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn breakdowns_reflect_completed_visits_per_service_and_staff() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let alice = create_client(&app, &salon_id, "Alice", "alice@example.com").await;
    let bob = create_client(&app, &salon_id, "Bob", "bob@example.com").await;
    let deep_tissue = create_service(&app, &salon_id, "Deep Tissue", 750, 60).await;
    let facial = create_service(&app, &salon_id, "Facial", 500, 45).await;
    let mara = create_staff(&app, &salon_id, "Mara", "mara@example.com", &[&deep_tissue]).await;
    let nina = create_staff(&app, &salon_id, "Nina", "nina@example.com", &[&facial]).await;

    let a1 = book(&app, &salon_id, &alice, &mara, &deep_tissue, at(7, 10, 0)).await;
    let a2 = book(&app, &salon_id, &bob, &mara, &deep_tissue, at(8, 10, 0)).await;
    let a3 = book(&app, &salon_id, &alice, &nina, &facial, at(7, 12, 0)).await;
    let _a4 = book(&app, &salon_id, &bob, &nina, &facial, at(8, 12, 0)).await;

    for id in [&a1, &a2, &a3] {
        set_status(&app, &salon_id, id, "confirmed").await;
        set_status(&app, &salon_id, id, "completed").await;
    }

    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/top-services", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let services = body.as_array().unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0]["name"], "Deep Tissue");
    assert_eq!(services[0]["completed_count"], 2);
    assert_eq!(services[1]["name"], "Facial");
    assert_eq!(services[1]["completed_count"], 1);

    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/staff?period=month", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let staff = body.as_array().unwrap();
    assert_eq!(staff.len(), 2);
    assert_eq!(staff[0]["name"], "Mara");
    assert_eq!(staff[0]["completed_count"], 2);
    assert_eq!(staff[0]["revenue"], 1500);
    assert_eq!(staff[1]["name"], "Nina");
    assert_eq!(staff[1]["revenue"], 500);

    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/status-breakdown?period=month", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let counts = body.as_array().unwrap();
    assert_eq!(counts[0]["status"], "completed");
    assert_eq!(counts[0]["count"], 3);
    assert_eq!(counts[1]["status"], "pending");
    assert_eq!(counts[1]["count"], 1);

    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/staff/{}?period=month", salon_id, mara), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["name"], "Mara");
    assert_eq!(body["total_bookings"], 2);
    assert_eq!(body["completed_bookings"], 2);
    assert_eq!(body["revenue"], 1500);
    assert_eq!(body["top_services"][0]["name"], "Deep Tissue");
    assert_eq!(body["top_services"][0]["completed_count"], 2);
    assert_eq!(body["recent_appointments"].as_array().unwrap().len(), 2);

    // Breakdown reads are for operators.
    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/top-services", salon_id), Some((&alice, "client")), None)
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn new_members_counts_registrations_inside_the_window() {
    let app = TestApp::new().await;
    let salon_id = create_salon(&app).await;
    let alice = create_client(&app, &salon_id, "Alice", "alice@example.com").await;
    let _bob = create_client(&app, &salon_id, "Bob", "bob@example.com").await;

    // Push one registration outside the month window.
    sqlx::query("UPDATE users SET created_at = ? WHERE id = ?")
        .bind(chrono::Utc::now() - chrono::Duration::days(40))
        .bind(&alice)
        .execute(&app.pool)
        .await
        .unwrap();

    let res = app
        .request("GET", &format!("/api/v1/{}/analytics/new-members?period=month", salon_id), Some(OWNER), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 2);
}
