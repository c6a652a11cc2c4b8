use crate::domain::models::{staff::{Staff, StaffWithUser}, user::User};
use crate::domain::ports::StaffRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteStaffRepo {
    pool: SqlitePool,
}

impl SqliteStaffRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for SqliteStaffRepo {
    async fn create_with_user(&self, staff: &Staff, user: &User, service_ids: &[String]) -> Result<Staff, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO users (id, salon_id, name, email, phone, role, dob, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&user.id).bind(&user.salon_id).bind(&user.name).bind(&user.email)
            .bind(&user.phone).bind(&user.role).bind(user.dob).bind(user.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Staff>(
            "INSERT INTO staff (id, salon_id, user_id, bio, color, working_hours, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&staff.id).bind(&staff.salon_id).bind(&staff.user_id).bind(&staff.bio)
            .bind(&staff.color).bind(&staff.working_hours).bind(staff.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for service_id in service_ids {
            sqlx::query("INSERT OR IGNORE INTO staff_services (staff_id, service_id) VALUES (?, ?)")
                .bind(&staff.id).bind(service_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<Staff>, AppError> {
        sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE salon_id = ? AND id = ?")
            .bind(salon_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, salon_id: &str, service_id: Option<&str>) -> Result<Vec<StaffWithUser>, AppError> {
        match service_id {
            Some(service_id) => {
                sqlx::query_as::<_, StaffWithUser>(
                    "SELECT s.*, u.name AS name, u.email AS email FROM staff s
                     JOIN users u ON u.id = s.user_id
                     WHERE s.salon_id = ?
                       AND EXISTS (SELECT 1 FROM staff_services ss WHERE ss.staff_id = s.id AND ss.service_id = ?)
                     ORDER BY u.name ASC"
                )
                    .bind(salon_id).bind(service_id)
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, StaffWithUser>(
                    "SELECT s.*, u.name AS name, u.email AS email FROM staff s
                     JOIN users u ON u.id = s.user_id
                     WHERE s.salon_id = ?
                     ORDER BY u.name ASC"
                )
                    .bind(salon_id)
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }

    async fn update(&self, staff: &Staff) -> Result<Staff, AppError> {
        sqlx::query_as::<_, Staff>(
            "UPDATE staff SET bio = ?, color = ?, working_hours = ? WHERE id = ? AND salon_id = ? RETURNING *"
        )
            .bind(&staff.bio).bind(&staff.color).bind(&staff.working_hours)
            .bind(&staff.id).bind(&staff.salon_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_services(&self, staff_id: &str, service_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM staff_services WHERE staff_id = ?")
            .bind(staff_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        for service_id in service_ids {
            sqlx::query("INSERT INTO staff_services (staff_id, service_id) VALUES (?, ?)")
                .bind(staff_id).bind(service_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn is_capable(&self, staff_id: &str, service_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM staff_services WHERE staff_id = ? AND service_id = ?")
            .bind(staff_id).bind(service_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count") > 0)
    }
}
