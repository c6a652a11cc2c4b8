use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::models::appointment::{Appointment, StatusCount};
use crate::domain::models::loyalty::{LoyaltyAccount, PointsTransaction};
use crate::domain::models::staff::WorkingHours;
use crate::domain::models::user::User;

#[derive(Serialize)]
pub struct AccountWithTransactions {
    pub account: LoyaltyAccount,
    pub transactions: Vec<PointsTransaction>,
}

#[derive(Serialize)]
pub struct ClientProfile {
    pub client: User,
    pub account: Option<LoyaltyAccount>,
    pub transactions: Vec<PointsTransaction>,
    pub appointments: Vec<Appointment>,
}

#[derive(Serialize)]
pub struct UpcomingBirthday {
    pub client_id: String,
    pub name: String,
    pub email: String,
    pub dob: NaiveDate,
    pub upcoming: NaiveDate,
}

#[derive(Serialize)]
pub struct BookedSlot {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub staff_id: String,
    pub date: NaiveDate,
    pub working_hours: WorkingHours,
    pub booked: Vec<BookedSlot>,
}

#[derive(Serialize)]
pub struct RevenueSummary {
    pub period: String,
    pub since: DateTime<Utc>,
    pub total: i64,
    pub completed_count: i64,
}

#[derive(Serialize)]
pub struct PointsEconomyReport {
    pub total_issued: i64,
    pub total_outstanding: i64,
    pub total_redeemed: i64,
    pub member_count: i64,
}

#[derive(Serialize)]
pub struct NewMembersReport {
    pub count: i64,
    pub total: i64,
}

#[derive(Serialize)]
pub struct TherapistServiceShare {
    pub service_id: String,
    pub name: String,
    pub completed_count: i64,
    pub revenue: i64,
}

#[derive(Serialize)]
pub struct TherapistDetail {
    pub staff_id: String,
    pub name: String,
    pub total_bookings: i64,
    pub completed_bookings: i64,
    pub revenue: i64,
    pub status_counts: Vec<StatusCount>,
    pub top_services: Vec<TherapistServiceShare>,
    pub recent_appointments: Vec<Appointment>,
}

#[derive(Serialize)]
pub struct BirthdayRunResult {
    pub credited: u64,
}
