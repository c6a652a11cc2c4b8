use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::{CreateAppointmentRequest, ListAppointmentsQuery, UpdateStatusRequest};
use crate::api::extractors::{auth::AuthUser, salon::SalonId};
use crate::domain::models::appointment::{
    Appointment, AppointmentFilter, NewAppointmentParams, STATUS_CANCELLED_BY_CLIENT, STATUS_COMPLETED,
};
use crate::domain::models::loyalty::{
    PointsTransaction, TX_EARNED, TX_REBOOKING_BONUS, TX_REDEEMED, TX_REFUNDED,
};
use crate::domain::models::user::ROLE_CLIENT;
use crate::domain::services::points::{points_earned, rebooking_cutoff};
use crate::domain::services::scheduling::{allowed_sources, conflicts_with_any};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = match payload.client_id {
        Some(id) if user.is_operator() || id == user.user_id => id,
        Some(_) => return Err(AppError::Forbidden("Clients can only book for themselves".into())),
        None => user.user_id.clone(),
    };

    let client = state.user_repo.find_by_id(&salon_id, &client_id).await?
        .filter(|u| u.role == ROLE_CLIENT)
        .ok_or(AppError::NotFound("Client not found".into()))?;

    let service = state.service_repo.find_by_id(&salon_id, &payload.service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;
    if !service.is_active {
        return Err(AppError::Validation("Service is no longer offered".into()));
    }

    let start_at = payload.start_at;
    let end_at = payload.end_at
        .unwrap_or(start_at + Duration::minutes(service.duration_mins as i64));
    if end_at <= start_at {
        return Err(AppError::Validation("End time must be after start time".into()));
    }
    if payload.points_to_redeem < 0 {
        return Err(AppError::Validation("Points to redeem cannot be negative".into()));
    }

    let staff_id = match &payload.staff_id {
        Some(id) => {
            let staff = state.staff_repo.find_by_id(&salon_id, id).await?
                .ok_or(AppError::NotFound("Staff member not found".into()))?;
            if !state.staff_repo.is_capable(&staff.id, &service.id).await? {
                return Err(AppError::Validation("This staff member does not offer that service".into()));
            }
            staff.id
        }
        None => resolve_free_staff(&state, &salon_id, &service.id, start_at, end_at).await?,
    };

    let redemption = if payload.points_to_redeem > 0 {
        let config = state.loyalty_repo.get_config(&salon_id).await?
            .ok_or(AppError::NotFound("Loyalty config not found".into()))?;
        if payload.points_to_redeem < config.min_redeem {
            return Err(AppError::Validation(format!(
                "Minimum redemption is {} points", config.min_redeem
            )));
        }
        let account = state.loyalty_repo.find_account(&salon_id, &client.id).await?
            .ok_or(AppError::NotFound("Loyalty account not found".into()))?;
        Some(PointsTransaction::debit(
            account.id,
            payload.points_to_redeem,
            TX_REDEEMED,
            None,
            format!("Redeemed against booking of {}", service.name),
        ))
    } else {
        None
    };

    let appointment = Appointment::new(NewAppointmentParams {
        salon_id,
        client_id: client.id,
        staff_id: Some(staff_id),
        service_id: service.id,
        start_at,
        end_at,
        notes: payload.notes,
        points_redeemed: payload.points_to_redeem,
        price: service.price,
        duration_mins: service.duration_mins,
    });

    let redemption = redemption.map(|mut entry| {
        entry.appointment_id = Some(appointment.id.clone());
        entry
    });

    let created = state.appointment_repo
        .create_with_redemption(&appointment, redemption.as_ref())
        .await?;

    info!("Appointment created: {} ({} at {})", created.id, service.name, created.start_at);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Picks the first capable staff member (by name) whose calendar is free over
/// `[start_at, end_at)`.
async fn resolve_free_staff(
    state: &AppState,
    salon_id: &str,
    service_id: &str,
    start_at: chrono::DateTime<Utc>,
    end_at: chrono::DateTime<Utc>,
) -> Result<String, AppError> {
    let candidates = state.staff_repo.list(salon_id, Some(service_id)).await?;
    if candidates.is_empty() {
        return Err(AppError::Validation("No staff member offers that service".into()));
    }

    for candidate in candidates {
        let existing = state.appointment_repo
            .list_active_for_staff(&candidate.id, start_at, end_at)
            .await?;
        if !conflicts_with_any(start_at, end_at, &existing) {
            return Ok(candidate.id);
        }
    }

    Err(AppError::Conflict("No staff member is available at that time".into()))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Path((_, appointment_id)): Path<(String, String)>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_status = payload.status.as_str();
    let allowed_from = allowed_sources(new_status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", new_status)))?;

    let existing = state.appointment_repo.find_by_id(&salon_id, &appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    if new_status == STATUS_CANCELLED_BY_CLIENT {
        if !user.is_operator() && existing.client_id != user.user_id {
            return Err(AppError::Forbidden("Clients can only cancel their own appointments".into()));
        }
    } else {
        user.require_operator()?;
    }

    // Ledger entries are computed up front and handed to the repository, which
    // applies them in the same transaction as the compare-and-set status
    // write. Concurrent writers race on the status column, so the points land
    // for exactly one winner, and a failed ledger write rolls the status back.
    let credits = match new_status {
        STATUS_COMPLETED => completion_credits(&state, &salon_id, &existing).await?,
        STATUS_CANCELLED_BY_CLIENT if existing.points_redeemed > 0 => {
            refund_credits(&state, &salon_id, &existing).await?
        }
        _ => Vec::new(),
    };

    let updated = state.appointment_repo
        .transition(&salon_id, &appointment_id, new_status, allowed_from, &credits)
        .await?;

    let Some(appointment) = updated else {
        let current = state.appointment_repo.find_by_id(&salon_id, &appointment_id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;
        return Err(AppError::InvalidTransition(format!(
            "Cannot move appointment from '{}' to '{}'", current.status, new_status
        )));
    };

    for entry in &credits {
        info!("Credited {} '{}' points to account {}", entry.amount, entry.tx_type, entry.account_id);
    }
    info!("Appointment {} moved to '{}'", appointment.id, new_status);
    Ok(Json(appointment))
}

/// Ledger entries a completion produces: earned points from the price
/// snapshot and, when another completed visit falls inside the rebooking
/// window, a separate rebooking bonus. Missing config or account is logged
/// and skipped; the completion stands.
async fn completion_credits(
    state: &AppState,
    salon_id: &str,
    appointment: &Appointment,
) -> Result<Vec<PointsTransaction>, AppError> {
    let Some(config) = state.loyalty_repo.get_config(salon_id).await? else {
        warn!("No loyalty config for salon {}; skipping points for {}", salon_id, appointment.id);
        return Ok(Vec::new());
    };
    let Some(account) = state.loyalty_repo.find_account(salon_id, &appointment.client_id).await? else {
        warn!("Client {} has no loyalty account; skipping points for {}", appointment.client_id, appointment.id);
        return Ok(Vec::new());
    };

    let mut credits = Vec::new();
    let earned = points_earned(appointment.price, &config);
    if earned > 0 {
        let description = match state.service_repo.find_by_id(salon_id, &appointment.service_id).await? {
            Some(service) => format!("Earned from {}", service.name),
            None => "Earned from completed appointment".to_string(),
        };
        credits.push(PointsTransaction::credit(
            account.id.clone(),
            earned,
            TX_EARNED,
            Some(appointment.id.clone()),
            description,
        ));
    }

    if config.rebooking_bonus > 0 {
        let since = rebooking_cutoff(Utc::now(), &config);
        let qualifies = state.appointment_repo
            .has_recent_completed(salon_id, &appointment.client_id, &appointment.id, since)
            .await?;
        if qualifies {
            credits.push(PointsTransaction::credit(
                account.id,
                config.rebooking_bonus,
                TX_REBOOKING_BONUS,
                Some(appointment.id.clone()),
                "Rebooking bonus reward".to_string(),
            ));
        }
    }

    Ok(credits)
}

/// Client-initiated cancellations give redeemed points back; salon-initiated
/// ones and no-shows do not.
async fn refund_credits(
    state: &AppState,
    salon_id: &str,
    appointment: &Appointment,
) -> Result<Vec<PointsTransaction>, AppError> {
    let Some(account) = state.loyalty_repo.find_account(salon_id, &appointment.client_id).await? else {
        warn!("Client {} has no loyalty account; cannot refund {} points", appointment.client_id, appointment.points_redeemed);
        return Ok(Vec::new());
    };

    Ok(vec![PointsTransaction::credit(
        account.id,
        appointment.points_redeemed,
        TX_REFUNDED,
        Some(appointment.id.clone()),
        "Points refunded due to cancellation".to_string(),
    )])
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let filter = AppointmentFilter {
        from: query.from,
        to: query.to,
        status: query.status,
        staff_id: query.staff_id,
        client_id: query.client_id,
    };
    let appointments = state.appointment_repo.list_filtered(&salon_id, &filter).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Path((_, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_id(&salon_id, &appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    if !user.is_operator() && appointment.client_id != user.user_id {
        return Err(AppError::Forbidden("Clients can only view their own appointments".into()));
    }

    Ok(Json(appointment))
}
