use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ClientSearchQuery, RegisterClientRequest};
use crate::api::dtos::responses::{ClientProfile, UpcomingBirthday};
use crate::api::extractors::{auth::AuthUser, salon::SalonId};
use crate::domain::models::loyalty::LoyaltyAccount;
use crate::domain::models::user::{User, ROLE_CLIENT};
use crate::error::AppError;
use crate::state::AppState;

pub async fn register_client(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Json(payload): Json<RegisterClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }

    let client = User::new_client(
        salon_id.clone(),
        payload.name,
        payload.email.trim().to_lowercase(),
        payload.phone,
        payload.dob,
    );
    let account = LoyaltyAccount::new(salon_id, client.id.clone());

    let created = state.user_repo.create_client(&client, &account).await?;
    info!("Client registered: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Query(query): Query<ClientSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;
    let clients = state.user_repo.list_clients(&salon_id, query.search.as_deref()).await?;
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Path((_, client_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_operator() && user.user_id != client_id {
        return Err(AppError::Forbidden("Clients can only view their own profile".into()));
    }

    let client = state.user_repo.find_by_id(&salon_id, &client_id).await?
        .filter(|u| u.role == ROLE_CLIENT)
        .ok_or(AppError::NotFound("Client not found".into()))?;

    let account = state.loyalty_repo.find_account(&salon_id, &client.id).await?;
    let transactions = match &account {
        Some(account) => state.loyalty_repo.list_transactions(&account.id, 20).await?,
        None => Vec::new(),
    };
    let appointments = state.appointment_repo.list_recent_for_client(&salon_id, &client.id, 10).await?;

    Ok(Json(ClientProfile { client, account, transactions, appointments }))
}

/// Clients whose birthday falls within the next 30 days.
pub async fn upcoming_birthdays(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let today = Utc::now().date_naive();
    let clients = state.user_repo.list_clients_with_dob(&salon_id).await?;

    let mut upcoming: Vec<UpcomingBirthday> = clients
        .into_iter()
        .filter_map(|client| {
            let dob = client.dob?;
            let next = next_occurrence(dob, today);
            ((next - today).num_days() <= 30).then(|| UpcomingBirthday {
                client_id: client.id,
                name: client.name,
                email: client.email,
                dob,
                upcoming: next,
            })
        })
        .collect();

    upcoming.sort_by_key(|b| b.upcoming);
    Ok(Json(upcoming))
}

/// Next calendar occurrence of `dob` on or after `today`. A Feb 29 birthday
/// falls on Mar 1 in non-leap years.
fn next_occurrence(dob: NaiveDate, today: NaiveDate) -> NaiveDate {
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, dob.month(), dob.day())
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 3, 1).unwrap())
    };
    let this_year = in_year(today.year());
    if this_year >= today {
        this_year
    } else {
        in_year(today.year() + 1)
    }
}
