use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

use crate::api::handlers::{analytics, appointment, client, health, loyalty, salon, service, staff};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Salons
        .route("/api/v1/salons", post(salon::create_salon))
        .route("/api/v1/salons/{id}", get(salon::get_salon))

        // Clients
        .route("/api/v1/{salon_id}/clients", post(client::register_client).get(client::list_clients))
        .route("/api/v1/{salon_id}/clients/birthdays", get(client::upcoming_birthdays))
        .route("/api/v1/{salon_id}/clients/{client_id}", get(client::get_client))

        // Catalog
        .route("/api/v1/{salon_id}/services", post(service::create_service).get(service::list_services))
        .route("/api/v1/{salon_id}/services/{service_id}", get(service::get_service).put(service::update_service))
        .route("/api/v1/{salon_id}/staff", post(staff::create_staff).get(staff::list_staff))
        .route("/api/v1/{salon_id}/staff/{staff_id}", put(staff::update_staff))
        .route("/api/v1/{salon_id}/staff/{staff_id}/availability", get(staff::get_availability))

        // Appointments
        .route("/api/v1/{salon_id}/appointments", post(appointment::create_appointment).get(appointment::list_appointments))
        .route("/api/v1/{salon_id}/appointments/{appointment_id}", get(appointment::get_appointment))
        .route("/api/v1/{salon_id}/appointments/{appointment_id}/status", put(appointment::update_status))

        // Loyalty
        .route("/api/v1/{salon_id}/loyalty/accounts/{client_id}", get(loyalty::get_account))
        .route("/api/v1/{salon_id}/loyalty/config", get(loyalty::get_config).put(loyalty::update_config))
        .route("/api/v1/{salon_id}/loyalty/adjust", post(loyalty::adjust_points))
        .route("/api/v1/{salon_id}/loyalty/redeem", post(loyalty::redeem_points))
        .route("/api/v1/{salon_id}/loyalty/birthday-credits", post(loyalty::run_birthday_credits_now))

        // Analytics
        .route("/api/v1/{salon_id}/analytics/revenue", get(analytics::revenue_summary))
        .route("/api/v1/{salon_id}/analytics/points", get(analytics::points_summary))
        .route("/api/v1/{salon_id}/analytics/top-services", get(analytics::top_services))
        .route("/api/v1/{salon_id}/analytics/status-breakdown", get(analytics::status_breakdown))
        .route("/api/v1/{salon_id}/analytics/new-members", get(analytics::new_members))
        .route("/api/v1/{salon_id}/analytics/staff", get(analytics::staff_performance))
        .route("/api/v1/{salon_id}/analytics/staff/{staff_id}", get(analytics::staff_detail))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        salon_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
