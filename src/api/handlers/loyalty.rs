use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{AdjustPointsRequest, RedeemPointsRequest, UpdateConfigRequest};
use crate::api::dtos::responses::{AccountWithTransactions, BirthdayRunResult};
use crate::api::extractors::{auth::AuthUser, salon::SalonId};
use crate::domain::models::loyalty::{
    LoyaltyConfig, PointsTransaction, TX_EXPIRED, TX_MILESTONE, TX_REDEEMED,
};
use crate::domain::services::birthday::run_birthday_credits;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Path((_, client_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_operator() && user.user_id != client_id {
        return Err(AppError::Forbidden("Clients can only view their own account".into()));
    }

    let account = state.loyalty_repo.find_account(&salon_id, &client_id).await?
        .ok_or(AppError::NotFound("Loyalty account not found".into()))?;
    let transactions = state.loyalty_repo.list_transactions(&account.id, 50).await?;

    Ok(Json(AccountWithTransactions { account, transactions }))
}

pub async fn get_config(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;
    let config = state.loyalty_repo.get_config(&salon_id).await?
        .ok_or(AppError::NotFound("Loyalty config not found".into()))?;
    Ok(Json(config))
}

pub async fn update_config(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Json(payload): Json<UpdateConfigRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_owner()?;

    let mut config = state.loyalty_repo.get_config(&salon_id).await?
        .unwrap_or_else(|| LoyaltyConfig::defaults(salon_id.clone()));

    if let Some(points_per_unit) = payload.points_per_unit {
        if points_per_unit < 0 {
            return Err(AppError::Validation("points_per_unit cannot be negative".into()));
        }
        config.points_per_unit = points_per_unit;
    }
    if let Some(currency_unit_amount) = payload.currency_unit_amount {
        if currency_unit_amount <= 0 {
            return Err(AppError::Validation("currency_unit_amount must be positive".into()));
        }
        config.currency_unit_amount = currency_unit_amount;
    }
    if let Some(rebooking_bonus) = payload.rebooking_bonus {
        if rebooking_bonus < 0 {
            return Err(AppError::Validation("rebooking_bonus cannot be negative".into()));
        }
        config.rebooking_bonus = rebooking_bonus;
    }
    if let Some(rebooking_window_days) = payload.rebooking_window_days {
        if rebooking_window_days < 0 {
            return Err(AppError::Validation("rebooking_window_days cannot be negative".into()));
        }
        config.rebooking_window_days = rebooking_window_days;
    }
    if let Some(birthday_bonus) = payload.birthday_bonus {
        if birthday_bonus < 0 {
            return Err(AppError::Validation("birthday_bonus cannot be negative".into()));
        }
        config.birthday_bonus = birthday_bonus;
    }
    if let Some(redemption_rate) = payload.redemption_rate {
        if redemption_rate <= 0 {
            return Err(AppError::Validation("redemption_rate must be positive".into()));
        }
        config.redemption_rate = redemption_rate;
    }
    if let Some(min_redeem) = payload.min_redeem {
        if min_redeem < 0 {
            return Err(AppError::Validation("min_redeem cannot be negative".into()));
        }
        config.min_redeem = min_redeem;
    }
    if let Some(expiry_days) = payload.expiry_days {
        if expiry_days <= 0 {
            return Err(AppError::Validation("expiry_days must be positive".into()));
        }
        config.expiry_days = Some(expiry_days);
    }
    config.updated_at = Utc::now();

    let updated = state.loyalty_repo.upsert_config(&config).await?;
    info!("Loyalty config updated for salon {}", updated.salon_id);
    Ok(Json(updated))
}

/// Signed manual correction. Positive amounts land as `milestone` credits,
/// negative ones as `expired` debits. A reason is mandatory either way.
pub async fn adjust_points(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Json(payload): Json<AdjustPointsRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(AppError::Validation("A reason is required for manual adjustments".into()));
    }
    if payload.amount == 0 {
        return Err(AppError::Validation("Adjustment amount cannot be zero".into()));
    }

    let account = state.loyalty_repo.find_account(&salon_id, &payload.client_id).await?
        .ok_or(AppError::NotFound("Loyalty account not found".into()))?;

    let description = format!("Admin adjustment: {}", reason);
    let updated = if payload.amount > 0 {
        let entry = PointsTransaction::credit(account.id, payload.amount, TX_MILESTONE, None, description);
        state.loyalty_repo.credit(&entry).await?
    } else {
        // The balance guard lives inside the debit transaction, so a
        // concurrent debit cannot slip past a pre-read here.
        let entry = PointsTransaction::debit(account.id, -payload.amount, TX_EXPIRED, None, description);
        match state.loyalty_repo.debit(&entry).await {
            Err(AppError::InsufficientBalance { .. }) => {
                return Err(AppError::Validation("Cannot reduce balance below zero.".into()));
            }
            other => other?,
        }
    };

    info!("Adjusted account {} by {} points", updated.id, payload.amount);
    Ok(Json(updated))
}

/// In-salon redemption at checkout. No minimum applies here; the minimum is a
/// booking-time rule.
pub async fn redeem_points(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
    Json(payload): Json<RedeemPointsRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    if payload.points <= 0 {
        return Err(AppError::Validation("Points to redeem must be positive".into()));
    }

    let account = state.loyalty_repo.find_account(&salon_id, &payload.client_id).await?
        .ok_or(AppError::NotFound("Loyalty account not found".into()))?;

    let reason = payload.reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| "Redeemed in salon by admin".to_string());

    let entry = PointsTransaction::debit(
        account.id,
        payload.points,
        TX_REDEEMED,
        payload.appointment_id,
        reason,
    );
    let updated = state.loyalty_repo.debit(&entry).await?;

    info!("Redeemed {} points from account {}", payload.points, updated.id);
    Ok(Json(updated))
}

pub async fn run_birthday_credits_now(
    State(state): State<Arc<AppState>>,
    SalonId(salon_id): SalonId,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.require_operator()?;

    let salon = state.salon_repo.find_by_id(&salon_id).await?
        .ok_or(AppError::NotFound("Salon not found".into()))?;
    let Some(config) = state.loyalty_repo.get_config(&salon_id).await? else {
        return Ok(Json(BirthdayRunResult { credited: 0 }));
    };

    let credited = run_birthday_credits(
        &salon,
        &config,
        state.user_repo.as_ref(),
        state.loyalty_repo.as_ref(),
    ).await?;

    info!("On-demand birthday run for salon {}: {} credited", salon_id, credited);
    Ok(Json(BirthdayRunResult { credited }))
}
