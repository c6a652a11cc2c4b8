use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Salon {
    pub id: String,
    pub name: String,
    pub address: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl Salon {
    pub fn new(name: String, address: String, timezone: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            address,
            timezone,
            created_at: Utc::now(),
        }
    }
}
