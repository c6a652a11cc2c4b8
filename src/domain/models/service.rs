use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub salon_id: String,
    pub name: String,
    pub category: String,
    pub duration_mins: i32,
    pub price: i64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewServiceParams {
    pub salon_id: String,
    pub name: String,
    pub category: String,
    pub duration_mins: i32,
    pub price: i64,
    pub description: Option<String>,
}

impl Service {
    pub fn new(params: NewServiceParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            salon_id: params.salon_id,
            name: params.name,
            category: params.category,
            duration_mins: params.duration_mins,
            price: params.price,
            description: params.description,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
