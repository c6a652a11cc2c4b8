use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateServiceRequest, UpdateServiceRequest};
use crate::api::extractors::{auth::AuthUser, salon::SalonId};
use crate::domain::models::service::{NewServiceParams, Service};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Service name is required".into()));
    }
    if payload.duration_mins <= 0 {
        return Err(AppError::Validation("Duration must be positive".into()));
    }
    if payload.price < 0 {
        return Err(AppError::Validation("Price cannot be negative".into()));
    }

    let service = Service::new(NewServiceParams {
        salon_id,
        name: payload.name,
        category: payload.category,
        duration_mins: payload.duration_mins,
        price: payload.price,
        description: payload.description,
    });

    let created = state.service_repo.create(&service).await?;
    info!("Service created: {} ({})", created.name, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    _user: AuthUser,
    Path((_, service_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_id(&salon_id, &service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;
    Ok(Json(service))
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list_active(&salon_id).await?;
    Ok(Json(services))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Path((_, service_id)): Path<(String, String)>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let mut service = state.service_repo.find_by_id(&salon_id, &service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Service name cannot be empty".into()));
        }
        service.name = name;
    }
    if let Some(category) = payload.category {
        service.category = category;
    }
    if let Some(duration_mins) = payload.duration_mins {
        if duration_mins <= 0 {
            return Err(AppError::Validation("Duration must be positive".into()));
        }
        service.duration_mins = duration_mins;
    }
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }
        service.price = price;
    }
    if let Some(description) = payload.description {
        service.description = Some(description);
    }
    if let Some(is_active) = payload.is_active {
        service.is_active = is_active;
    }

    let updated = state.service_repo.update(&service).await?;
    info!("Service updated: {}", updated.id);
    Ok(Json(updated))
}
