use crate::domain::models::{loyalty::LoyaltyConfig, salon::Salon};
use crate::domain::ports::SalonRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSalonRepo {
    pool: SqlitePool,
}

impl SqliteSalonRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalonRepository for SqliteSalonRepo {
    async fn create(&self, salon: &Salon, config: &LoyaltyConfig) -> Result<Salon, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Salon>(
            "INSERT INTO salons (id, name, address, timezone, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&salon.id).bind(&salon.name).bind(&salon.address).bind(&salon.timezone).bind(salon.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO loyalty_configs (salon_id, points_per_unit, currency_unit_amount, rebooking_bonus, rebooking_window_days, birthday_bonus, redemption_rate, min_redeem, expiry_days, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&config.salon_id).bind(config.points_per_unit).bind(config.currency_unit_amount)
            .bind(config.rebooking_bonus).bind(config.rebooking_window_days).bind(config.birthday_bonus)
            .bind(config.redemption_rate).bind(config.min_redeem).bind(config.expiry_days).bind(config.updated_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Salon>, AppError> {
        sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Salon>, AppError> {
        sqlx::query_as::<_, Salon>("SELECT * FROM salons ORDER BY created_at ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
