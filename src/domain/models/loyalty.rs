use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const TX_EARNED: &str = "earned";
pub const TX_REDEEMED: &str = "redeemed";
pub const TX_BIRTHDAY: &str = "birthday";
pub const TX_REBOOKING_BONUS: &str = "rebooking_bonus";
pub const TX_REFERRAL: &str = "referral";
pub const TX_MILESTONE: &str = "milestone";
pub const TX_EXPIRED: &str = "expired";
pub const TX_REFUNDED: &str = "refunded";

/// Transaction types that count towards `lifetime_earned`.
pub fn is_earning_type(tx_type: &str) -> bool {
    matches!(
        tx_type,
        TX_EARNED | TX_BIRTHDAY | TX_REBOOKING_BONUS | TX_REFERRAL | TX_MILESTONE | TX_REFUNDED
    )
}

/// One balance-and-history record per client, scoped to a salon.
/// `balance` never goes negative; `lifetime_earned` never decreases. Both are
/// mutated only by the ledger repo, never by direct field writes.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct LoyaltyAccount {
    pub id: String,
    pub salon_id: String,
    pub client_id: String,
    pub balance: i64,
    pub lifetime_earned: i64,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl LoyaltyAccount {
    pub fn new(salon_id: String, client_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            salon_id,
            client_id,
            balance: 0,
            lifetime_earned: 0,
            last_activity_at: now,
            created_at: now,
        }
    }
}

/// Append-only ledger entry. The sum of `amount` over an account's
/// transactions equals its balance at all times.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PointsTransaction {
    pub id: String,
    pub account_id: String,
    pub appointment_id: Option<String>,
    pub tx_type: String,
    pub amount: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl PointsTransaction {
    /// A positive ledger entry. `amount` must be > 0.
    pub fn credit(
        account_id: String,
        amount: i64,
        tx_type: &str,
        appointment_id: Option<String>,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            appointment_id,
            tx_type: tx_type.to_string(),
            amount,
            description,
            created_at: Utc::now(),
        }
    }

    /// A negative ledger entry. `amount` must be > 0; it is stored as `-amount`.
    pub fn debit(
        account_id: String,
        amount: i64,
        tx_type: &str,
        appointment_id: Option<String>,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            appointment_id,
            tx_type: tx_type.to_string(),
            amount: -amount,
            description,
            created_at: Utc::now(),
        }
    }
}

/// Per-salon tunables for the points program. One row per salon.
/// `expiry_days` is stored but no expiry sweep exists yet.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct LoyaltyConfig {
    pub salon_id: String,
    pub points_per_unit: i64,
    pub currency_unit_amount: i64,
    pub rebooking_bonus: i64,
    pub rebooking_window_days: i32,
    pub birthday_bonus: i64,
    pub redemption_rate: i64,
    pub min_redeem: i64,
    pub expiry_days: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl LoyaltyConfig {
    pub fn defaults(salon_id: String) -> Self {
        Self {
            salon_id,
            points_per_unit: 1,
            currency_unit_amount: 10,
            rebooking_bonus: 50,
            rebooking_window_days: 56,
            birthday_bonus: 200,
            redemption_rate: 100,
            min_redeem: 500,
            expiry_days: None,
            updated_at: Utc::now(),
        }
    }
}

/// Aggregate view of a salon's points economy.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PointsEconomy {
    pub total_issued: i64,
    pub total_outstanding: i64,
    pub member_count: i64,
}
