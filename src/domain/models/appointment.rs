use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_NO_SHOW: &str = "no_show";
pub const STATUS_CANCELLED_BY_CLIENT: &str = "cancelled_by_client";
pub const STATUS_CANCELLED_BY_SPA: &str = "cancelled_by_spa";

/// A committed reservation. `price` and `duration_mins` are snapshots of the
/// service at booking time so later catalog edits cannot rewrite the
/// economics of past visits. Appointments are never deleted; cancellation is
/// a status.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub salon_id: String,
    pub client_id: String,
    pub staff_id: Option<String>,
    pub service_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub points_redeemed: i64,
    pub price: i64,
    pub duration_mins: i32,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub salon_id: String,
    pub client_id: String,
    pub staff_id: Option<String>,
    pub service_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub points_redeemed: i64,
    pub price: i64,
    pub duration_mins: i32,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            salon_id: params.salon_id,
            client_id: params.client_id,
            staff_id: params.staff_id,
            service_id: params.service_id,
            start_at: params.start_at,
            end_at: params.end_at,
            status: STATUS_PENDING.to_string(),
            notes: params.notes,
            points_redeemed: params.points_redeemed,
            price: params.price,
            duration_mins: params.duration_mins,
            created_at: Utc::now(),
        }
    }
}

/// Completed-visit count per service, with the catalog row's current
/// name/price alongside.
#[derive(Debug, Serialize, FromRow)]
pub struct ServicePopularity {
    pub service_id: String,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub completed_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Completed-visit count and snapshot revenue per staff member.
#[derive(Debug, Serialize, FromRow)]
pub struct StaffProduction {
    pub staff_id: String,
    pub name: String,
    pub completed_count: i64,
    pub revenue: i64,
}

/// Optional filters for salon-scoped appointment listings.
#[derive(Debug, Default, Clone)]
pub struct AppointmentFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub staff_id: Option<String>,
    pub client_id: Option<String>,
}
