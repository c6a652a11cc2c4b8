use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use sqlx::types::Json as SqlJson;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{AvailabilityQuery, CreateStaffRequest, StaffListQuery, UpdateStaffRequest};
use crate::api::dtos::responses::{AvailabilityResponse, BookedSlot};
use crate::api::extractors::{auth::AuthUser, salon::SalonId};
use crate::domain::models::staff::Staff;
use crate::domain::models::user::User;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }

    for service_id in &payload.service_ids {
        state.service_repo.find_by_id(&salon_id, service_id).await?
            .ok_or_else(|| AppError::Validation(format!("Unknown service '{}'", service_id)))?;
    }

    let identity = User::new_staff(salon_id.clone(), payload.name, payload.email.trim().to_lowercase());
    let staff = Staff::new(salon_id, identity.id.clone(), payload.bio, payload.color);

    let created = state.staff_repo.create_with_user(&staff, &identity, &payload.service_ids).await?;
    info!("Staff member created: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    _user: AuthUser,
    Query(query): Query<StaffListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let staff = state.staff_repo.list(&salon_id, query.service_id.as_deref()).await?;
    Ok(Json(staff))
}

pub async fn update_staff(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Path((_, staff_id)): Path<(String, String)>,
    Json(payload): Json<UpdateStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let mut staff = state.staff_repo.find_by_id(&salon_id, &staff_id).await?
        .ok_or(AppError::NotFound("Staff member not found".into()))?;

    if let Some(bio) = payload.bio {
        staff.bio = bio;
    }
    if let Some(color) = payload.color {
        staff.color = color;
    }
    if let Some(working_hours) = payload.working_hours {
        staff.working_hours = SqlJson(working_hours);
    }

    let updated = state.staff_repo.update(&staff).await?;

    if let Some(service_ids) = payload.service_ids {
        for service_id in &service_ids {
            state.service_repo.find_by_id(&salon_id, service_id).await?
                .ok_or_else(|| AppError::Validation(format!("Unknown service '{}'", service_id)))?;
        }
        state.staff_repo.set_services(&updated.id, &service_ids).await?;
    }

    info!("Staff member updated: {}", updated.id);
    Ok(Json(updated))
}

/// Working hours plus the already-booked (pending/confirmed) slots for one
/// UTC day, so a frontend can render free slots.
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    _user: AuthUser,
    Path((_, staff_id)): Path<(String, String)>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let staff = state.staff_repo.find_by_id(&salon_id, &staff_id).await?
        .ok_or(AppError::NotFound("Staff member not found".into()))?;

    let day_start = query.date
        .and_hms_opt(0, 0, 0)
        .ok_or(AppError::Validation("Invalid date".into()))?
        .and_utc();
    let day_end = day_start + Duration::days(1);

    let active = state.appointment_repo.list_active_for_staff(&staff.id, day_start, day_end).await?;
    let booked = active
        .into_iter()
        .map(|a| BookedSlot { start_at: a.start_at, end_at: a.end_at })
        .collect();

    Ok(Json(AvailabilityResponse {
        staff_id: staff.id,
        date: query.date,
        working_hours: staff.working_hours.0,
        booked,
    }))
}
