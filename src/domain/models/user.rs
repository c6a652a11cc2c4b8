use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_OWNER: &str = "owner";

/// A person known to a salon: clients book appointments, staff and owners
/// operate the salon. Authentication lives upstream; this row only carries
/// identity and contact data.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub salon_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new_client(salon_id: String, name: String, email: String, phone: Option<String>, dob: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            salon_id,
            name,
            email,
            phone,
            role: ROLE_CLIENT.to_string(),
            dob,
            created_at: Utc::now(),
        }
    }

    pub fn new_staff(salon_id: String, name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            salon_id,
            name,
            email,
            phone: None,
            role: ROLE_STAFF.to_string(),
            dob: None,
            created_at: Utc::now(),
        }
    }
}
