use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::models::staff::WorkingHours;

#[derive(Deserialize)]
pub struct CreateSalonRequest {
    pub name: String,
    pub address: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterClientRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dob: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct ClientSearchQuery {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub category: String,
    pub duration_mins: i32,
    pub price: i64,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub duration_mins: Option<i32>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub service_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateStaffRequest {
    pub bio: Option<String>,
    pub color: Option<String>,
    pub working_hours: Option<WorkingHours>,
    pub service_ids: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct StaffListQuery {
    pub service_id: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    /// Operators may book on behalf of a client; clients book themselves.
    pub client_id: Option<String>,
    pub staff_id: Option<String>,
    pub service_id: String,
    pub start_at: DateTime<Utc>,
    /// Defaults to `start_at` plus the service duration.
    pub end_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[serde(default)]
    pub points_to_redeem: i64,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ListAppointmentsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub staff_id: Option<String>,
    pub client_id: Option<String>,
}

#[derive(Deserialize)]
pub struct AdjustPointsRequest {
    pub client_id: String,
    pub amount: i64,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct RedeemPointsRequest {
    pub client_id: String,
    pub points: i64,
    pub reason: Option<String>,
    pub appointment_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateConfigRequest {
    pub points_per_unit: Option<i64>,
    pub currency_unit_amount: Option<i64>,
    pub rebooking_bonus: Option<i64>,
    pub rebooking_window_days: Option<i32>,
    pub birthday_bonus: Option<i64>,
    pub redemption_rate: Option<i64>,
    pub min_redeem: Option<i64>,
    pub expiry_days: Option<i32>,
}

/// Shared `?period=day|week|month|year` window for the analytics endpoints.
#[derive(Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}
