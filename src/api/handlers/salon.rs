use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateSalonRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::loyalty::LoyaltyConfig;
use crate::domain::models::salon::Salon;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_salon(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateSalonRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_owner()?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Salon name is required".into()));
    }

    let timezone = payload.timezone.unwrap_or_else(|| "UTC".to_string());
    timezone
        .parse::<Tz>()
        .map_err(|_| AppError::Validation(format!("Unknown timezone '{}'", timezone)))?;

    let salon = Salon::new(payload.name, payload.address.unwrap_or_default(), timezone);
    let config = LoyaltyConfig::defaults(salon.id.clone());

    let created = state.salon_repo.create(&salon, &config).await?;
    info!("Salon created: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_salon(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let salon = state.salon_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Salon not found".into()))?;
    Ok(Json(salon))
}
