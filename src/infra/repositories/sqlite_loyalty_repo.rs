use crate::domain::models::loyalty::{
    is_earning_type, LoyaltyAccount, LoyaltyConfig, PointsEconomy, PointsTransaction,
};
use crate::domain::ports::LoyaltyRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteLoyaltyRepo {
    pool: SqlitePool,
}

impl SqliteLoyaltyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoyaltyRepository for SqliteLoyaltyRepo {
    async fn find_account(&self, salon_id: &str, client_id: &str) -> Result<Option<LoyaltyAccount>, AppError> {
        sqlx::query_as::<_, LoyaltyAccount>(
            "SELECT * FROM loyalty_accounts WHERE salon_id = ? AND client_id = ?"
        )
            .bind(salon_id).bind(client_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_transactions(&self, account_id: &str, limit: i64) -> Result<Vec<PointsTransaction>, AppError> {
        sqlx::query_as::<_, PointsTransaction>(
            "SELECT * FROM points_transactions WHERE account_id = ? ORDER BY created_at DESC LIMIT ?"
        )
            .bind(account_id).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn credit(&self, entry: &PointsTransaction) -> Result<LoyaltyAccount, AppError> {
        let lifetime_increment = if is_earning_type(&entry.tx_type) { entry.amount } else { 0 };

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let account = sqlx::query_as::<_, LoyaltyAccount>(
            "UPDATE loyalty_accounts SET balance = balance + ?, lifetime_earned = lifetime_earned + ?, last_activity_at = ? WHERE id = ? RETURNING *"
        )
            .bind(entry.amount).bind(lifetime_increment).bind(entry.created_at).bind(&entry.account_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Loyalty account not found".to_string()))?;

        sqlx::query(
            "INSERT INTO points_transactions (id, account_id, appointment_id, tx_type, amount, description, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&entry.id).bind(&entry.account_id).bind(&entry.appointment_id)
            .bind(&entry.tx_type).bind(entry.amount).bind(&entry.description).bind(entry.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(account)
    }

    async fn debit(&self, entry: &PointsTransaction) -> Result<LoyaltyAccount, AppError> {
        let requested = -entry.amount;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let balance: Option<i64> = sqlx::query_scalar("SELECT balance FROM loyalty_accounts WHERE id = ?")
            .bind(&entry.account_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        let balance = balance.ok_or(AppError::NotFound("Loyalty account not found".to_string()))?;
        if balance < requested {
            return Err(AppError::InsufficientBalance { requested, balance });
        }

        let account = sqlx::query_as::<_, LoyaltyAccount>(
            "UPDATE loyalty_accounts SET balance = balance + ?, last_activity_at = ? WHERE id = ? RETURNING *"
        )
            .bind(entry.amount).bind(entry.created_at).bind(&entry.account_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO points_transactions (id, account_id, appointment_id, tx_type, amount, description, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&entry.id).bind(&entry.account_id).bind(&entry.appointment_id)
            .bind(&entry.tx_type).bind(entry.amount).bind(&entry.description).bind(entry.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(account)
    }

    async fn get_config(&self, salon_id: &str) -> Result<Option<LoyaltyConfig>, AppError> {
        sqlx::query_as::<_, LoyaltyConfig>("SELECT * FROM loyalty_configs WHERE salon_id = ?")
            .bind(salon_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn upsert_config(&self, config: &LoyaltyConfig) -> Result<LoyaltyConfig, AppError> {
        sqlx::query_as::<_, LoyaltyConfig>(
            "INSERT INTO loyalty_configs (salon_id, points_per_unit, currency_unit_amount, rebooking_bonus, rebooking_window_days, birthday_bonus, redemption_rate, min_redeem, expiry_days, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (salon_id) DO UPDATE SET
                points_per_unit = excluded.points_per_unit,
                currency_unit_amount = excluded.currency_unit_amount,
                rebooking_bonus = excluded.rebooking_bonus,
                rebooking_window_days = excluded.rebooking_window_days,
                birthday_bonus = excluded.birthday_bonus,
                redemption_rate = excluded.redemption_rate,
                min_redeem = excluded.min_redeem,
                expiry_days = excluded.expiry_days,
                updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(&config.salon_id).bind(config.points_per_unit).bind(config.currency_unit_amount)
            .bind(config.rebooking_bonus).bind(config.rebooking_window_days).bind(config.birthday_bonus)
            .bind(config.redemption_rate).bind(config.min_redeem).bind(config.expiry_days).bind(config.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn has_birthday_credit_since(&self, account_id: &str, since: DateTime<Utc>) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM points_transactions WHERE account_id = ? AND tx_type = 'birthday' AND created_at >= ?"
        )
            .bind(account_id).bind(since)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(count > 0)
    }

    async fn points_economy(&self, salon_id: &str) -> Result<PointsEconomy, AppError> {
        sqlx::query_as::<_, PointsEconomy>(
            "SELECT COALESCE(SUM(lifetime_earned), 0) AS total_issued, COALESCE(SUM(balance), 0) AS total_outstanding, COUNT(*) AS member_count
             FROM loyalty_accounts WHERE salon_id = ?"
        )
            .bind(salon_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
