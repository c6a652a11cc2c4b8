use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use loyalbook_backend::{
    api::router::create_router,
    config::Config,
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_loyalty_repo::SqliteLoyaltyRepo,
        sqlite_salon_repo::SqliteSalonRepo, sqlite_service_repo::SqliteServiceRepo,
        sqlite_staff_repo::SqliteStaffRepo, sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};

/// Owner identity forwarded by the (absent) upstream gateway.
pub const OWNER: (&str, &str) = ("owner-1", "owner");

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            birthday_sweep_interval_secs: 3600,
        };

        let state = Arc::new(AppState {
            config,
            salon_repo: Arc::new(SqliteSalonRepo::new(pool.clone())),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
            staff_repo: Arc::new(SqliteStaffRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            loyalty_repo: Arc::new(SqliteLoyaltyRepo::new(pool.clone())),
        });

        let router = create_router(state.clone());

        Self { router, pool, db_filename, state }
    }

    /// Sends one request through the router. `identity` becomes the
    /// `X-User-Id` / `X-User-Role` headers.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        identity: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some((user_id, role)) = identity {
            builder = builder
                .header("X-User-Id", user_id)
                .header("X-User-Role", role);
        }

        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn create_salon(app: &TestApp) -> String {
    let res = app
        .request(
            "POST",
            "/api/v1/salons",
            Some(OWNER),
            Some(json!({ "name": "Willow Spa", "address": "1 Main St", "timezone": "UTC" })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_client(app: &TestApp, salon_id: &str, name: &str, email: &str) -> String {
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/clients", salon_id),
            Some(OWNER),
            Some(json!({ "name": name, "email": email })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_client_with_dob(
    app: &TestApp,
    salon_id: &str,
    name: &str,
    email: &str,
    dob: &str,
) -> String {
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/clients", salon_id),
            Some(OWNER),
            Some(json!({ "name": name, "email": email, "dob": dob })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_service(
    app: &TestApp,
    salon_id: &str,
    name: &str,
    price: i64,
    duration_mins: i32,
) -> String {
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/services", salon_id),
            Some(OWNER),
            Some(json!({
                "name": name,
                "category": "massage",
                "duration_mins": duration_mins,
                "price": price
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_staff(
    app: &TestApp,
    salon_id: &str,
    name: &str,
    email: &str,
    service_ids: &[&str],
) -> String {
    let res = app
        .request(
            "POST",
            &format!("/api/v1/{}/staff", salon_id),
            Some(OWNER),
            Some(json!({ "name": name, "email": email, "service_ids": service_ids })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn set_status(
    app: &TestApp,
    salon_id: &str,
    appointment_id: &str,
    status: &str,
) -> Response {
    app.request(
        "PUT",
        &format!("/api/v1/{}/appointments/{}/status", salon_id, appointment_id),
        Some(OWNER),
        Some(json!({ "status": status })),
    )
    .await
}

#[allow(dead_code)]
pub async fn get_account(app: &TestApp, salon_id: &str, client_id: &str) -> Value {
    let res = app
        .request(
            "GET",
            &format!("/api/v1/{}/loyalty/accounts/{}", salon_id, client_id),
            Some(OWNER),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

/// RFC 3339 timestamp `days` days from now at `hour:minute` UTC.
#[allow(dead_code)]
pub fn at(days: i64, hour: u32, minute: u32) -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(days))
        .and_hms_opt(hour, minute, 0)
        .unwrap()
        .and_utc()
        .to_rfc3339()
}
