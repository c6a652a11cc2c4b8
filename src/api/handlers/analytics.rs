use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::api::dtos::requests::PeriodQuery;
use crate::api::dtos::responses::{
    NewMembersReport, PointsEconomyReport, RevenueSummary, TherapistDetail, TherapistServiceShare,
};
use crate::api::extractors::{auth::AuthUser, salon::SalonId};
use crate::domain::models::appointment::{AppointmentFilter, StatusCount, STATUS_COMPLETED};
use crate::error::AppError;
use crate::state::AppState;

/// Resolves `?period=` to its cutoff. Defaults to a month.
fn period_window(period: Option<String>) -> Result<(String, DateTime<Utc>), AppError> {
    let period = period.unwrap_or_else(|| "month".to_string());
    let days = match period.as_str() {
        "day" => 1,
        "week" => 7,
        "month" => 30,
        "year" => 365,
        other => return Err(AppError::Validation(format!("Unknown period '{}'", other))),
    };
    Ok((period, Utc::now() - Duration::days(days)))
}

pub async fn revenue_summary(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let (period, since) = period_window(query.period)?;
    let (total, completed_count) = state.appointment_repo.completed_revenue_since(&salon_id, since).await?;
    Ok(Json(RevenueSummary { period, since, total, completed_count }))
}

pub async fn points_summary(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let economy = state.loyalty_repo.points_economy(&salon_id).await?;
    Ok(Json(PointsEconomyReport {
        total_issued: economy.total_issued,
        total_outstanding: economy.total_outstanding,
        total_redeemed: economy.total_issued - economy.total_outstanding,
        member_count: economy.member_count,
    }))
}

/// Most-completed services, all time.
pub async fn top_services(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    Ok(Json(state.appointment_repo.top_services(&salon_id, 8).await?))
}

pub async fn status_breakdown(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let (_, since) = period_window(query.period)?;
    Ok(Json(state.appointment_repo.status_breakdown(&salon_id, since).await?))
}

pub async fn new_members(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let (_, since) = period_window(query.period)?;
    let count = state.user_repo.count_clients(&salon_id, Some(since)).await?;
    let total = state.user_repo.count_clients(&salon_id, None).await?;
    Ok(Json(NewMembersReport { count, total }))
}

pub async fn staff_performance(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let (_, since) = period_window(query.period)?;
    Ok(Json(state.appointment_repo.staff_performance(&salon_id, since).await?))
}

/// One staff member's window in detail: volumes, snapshot revenue, a status
/// breakdown, their most-completed services, and the latest bookings.
pub async fn staff_detail(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Path((_, staff_id)): Path<(String, String)>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let (_, since) = period_window(query.period)?;
    let member = state.staff_repo.list(&salon_id, None).await?
        .into_iter()
        .find(|s| s.id == staff_id)
        .ok_or(AppError::NotFound("Staff member not found".into()))?;

    let filter = AppointmentFilter {
        from: Some(since),
        staff_id: Some(staff_id),
        ..Default::default()
    };
    let mut appointments = state.appointment_repo.list_filtered(&salon_id, &filter).await?;
    appointments.sort_by(|a, b| b.start_at.cmp(&a.start_at));

    let completed_bookings = appointments.iter().filter(|a| a.status == STATUS_COMPLETED).count() as i64;
    let revenue: i64 = appointments.iter()
        .filter(|a| a.status == STATUS_COMPLETED)
        .map(|a| a.price)
        .sum();

    let mut status_counts: Vec<StatusCount> = Vec::new();
    for appointment in &appointments {
        match status_counts.iter_mut().find(|c| c.status == appointment.status) {
            Some(entry) => entry.count += 1,
            None => status_counts.push(StatusCount { status: appointment.status.clone(), count: 1 }),
        }
    }

    let mut per_service: Vec<(String, i64, i64)> = Vec::new();
    for appointment in appointments.iter().filter(|a| a.status == STATUS_COMPLETED) {
        match per_service.iter_mut().find(|(id, _, _)| *id == appointment.service_id) {
            Some((_, count, service_revenue)) => {
                *count += 1;
                *service_revenue += appointment.price;
            }
            None => per_service.push((appointment.service_id.clone(), 1, appointment.price)),
        }
    }
    per_service.sort_by(|a, b| b.1.cmp(&a.1));
    per_service.truncate(5);

    let mut top_services = Vec::with_capacity(per_service.len());
    for (service_id, completed_count, service_revenue) in per_service {
        let name = match state.service_repo.find_by_id(&salon_id, &service_id).await? {
            Some(service) => service.name,
            None => "Removed service".to_string(),
        };
        top_services.push(TherapistServiceShare {
            service_id,
            name,
            completed_count,
            revenue: service_revenue,
        });
    }

    let total_bookings = appointments.len() as i64;
    appointments.truncate(20);

    Ok(Json(TherapistDetail {
        staff_id: member.id,
        name: member.name,
        total_bookings,
        completed_bookings,
        revenue,
        status_counts,
        top_services,
        recent_appointments: appointments,
    }))
}
