use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

/// Per-weekday open/close windows, "HH:MM" local time. A missing day means
/// the staff member does not work that day.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct WorkingHours {
    pub mon: Option<DayHours>,
    pub tue: Option<DayHours>,
    pub wed: Option<DayHours>,
    pub thu: Option<DayHours>,
    pub fri: Option<DayHours>,
    pub sat: Option<DayHours>,
    pub sun: Option<DayHours>,
}

impl WorkingHours {
    pub fn standard_week() -> Self {
        let weekday = DayHours { open: "09:00".to_string(), close: "17:00".to_string() };
        Self {
            mon: Some(weekday.clone()),
            tue: Some(weekday.clone()),
            wed: Some(weekday.clone()),
            thu: Some(weekday.clone()),
            fri: Some(weekday),
            sat: Some(DayHours { open: "09:00".to_string(), close: "14:00".to_string() }),
            sun: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Staff {
    pub id: String,
    pub salon_id: String,
    pub user_id: String,
    pub bio: String,
    pub color: String,
    pub working_hours: Json<WorkingHours>,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    pub fn new(salon_id: String, user_id: String, bio: Option<String>, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            salon_id,
            user_id,
            bio: bio.unwrap_or_default(),
            color: color.unwrap_or_else(|| "#c4a882".to_string()),
            working_hours: Json(WorkingHours::standard_week()),
            created_at: Utc::now(),
        }
    }
}

/// Staff row joined with its user identity, for listings.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct StaffWithUser {
    pub id: String,
    pub salon_id: String,
    pub user_id: String,
    pub bio: String,
    pub color: String,
    pub working_hours: Json<WorkingHours>,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
}
