use crate::domain::models::{loyalty::LoyaltyAccount, user::User};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create_client(&self, user: &User, account: &LoyaltyAccount) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, salon_id, name, email, phone, role, dob, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&user.id).bind(&user.salon_id).bind(&user.name).bind(&user.email)
            .bind(&user.phone).bind(&user.role).bind(user.dob).bind(user.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO loyalty_accounts (id, salon_id, client_id, balance, lifetime_earned, last_activity_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&account.id).bind(&account.salon_id).bind(&account.client_id)
            .bind(account.balance).bind(account.lifetime_earned)
            .bind(account.last_activity_at).bind(account.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE salon_id = ? AND id = ?")
            .bind(salon_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_clients(&self, salon_id: &str, search: Option<&str>) -> Result<Vec<User>, AppError> {
        match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, User>(
                    "SELECT * FROM users WHERE salon_id = ? AND role = 'client' AND (name LIKE ? OR email LIKE ?) ORDER BY created_at DESC"
                )
                    .bind(salon_id).bind(&pattern).bind(&pattern)
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, User>(
                    "SELECT * FROM users WHERE salon_id = ? AND role = 'client' ORDER BY created_at DESC"
                )
                    .bind(salon_id).fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }

    async fn list_clients_with_dob(&self, salon_id: &str) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE salon_id = ? AND role = 'client' AND dob IS NOT NULL"
        )
            .bind(salon_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_clients(&self, salon_id: &str, since: Option<DateTime<Utc>>) -> Result<i64, AppError> {
        match since {
            Some(cutoff) => sqlx::query_scalar(
                "SELECT COUNT(*) FROM users WHERE salon_id = ? AND role = 'client' AND created_at >= ?"
            )
                .bind(salon_id).bind(cutoff)
                .fetch_one(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_scalar(
                "SELECT COUNT(*) FROM users WHERE salon_id = ? AND role = 'client'"
            )
                .bind(salon_id)
                .fetch_one(&self.pool).await.map_err(AppError::Database),
        }
    }
}
