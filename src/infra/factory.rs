use std::str::FromStr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_loyalty_repo::PostgresLoyaltyRepo,
    postgres_salon_repo::PostgresSalonRepo, postgres_service_repo::PostgresServiceRepo,
    postgres_staff_repo::PostgresStaffRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_loyalty_repo::SqliteLoyaltyRepo,
    sqlite_salon_repo::SqliteSalonRepo, sqlite_service_repo::SqliteServiceRepo,
    sqlite_staff_repo::SqliteStaffRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

/// Builds the application state for whichever database the URL points at,
/// running migrations for that dialect first.
pub async fn bootstrap_state(config: Config) -> Result<AppState, AppError> {
    if config.database_url.starts_with("postgres://") || config.database_url.starts_with("postgresql://") {
        info!("Using PostgreSQL backend");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .map_err(AppError::Database)?;

        sqlx::migrate!("./migrations/postgres")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(e.into()))?;

        Ok(AppState {
            config,
            salon_repo: Arc::new(PostgresSalonRepo::new(pool.clone())),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            service_repo: Arc::new(PostgresServiceRepo::new(pool.clone())),
            staff_repo: Arc::new(PostgresStaffRepo::new(pool.clone())),
            appointment_repo: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            loyalty_repo: Arc::new(PostgresLoyaltyRepo::new(pool)),
        })
    } else {
        info!("Using SQLite backend");
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(AppError::Database)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(AppError::Database)?;

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(e.into()))?;

        Ok(AppState {
            config,
            salon_repo: Arc::new(SqliteSalonRepo::new(pool.clone())),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
            staff_repo: Arc::new(SqliteStaffRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            loyalty_repo: Arc::new(SqliteLoyaltyRepo::new(pool)),
        })
    }
}
