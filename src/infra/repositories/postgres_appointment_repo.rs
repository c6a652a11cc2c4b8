use crate::domain::models::appointment::{
    Appointment, AppointmentFilter, ServicePopularity, StaffProduction, StatusCount,
};
use crate::domain::models::loyalty::{is_earning_type, PointsTransaction};
use crate::domain::ports::AppointmentRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create_with_redemption(
        &self,
        appointment: &Appointment,
        redemption: Option<&PointsTransaction>,
    ) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Under read committed, two writers would both pass the COUNT checks
        // below. Locking the client and staff rows serializes concurrent
        // bookings over the same people until commit.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(&appointment.client_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        if let Some(staff_id) = &appointment.staff_id {
            sqlx::query("SELECT id FROM staff WHERE id = $1 FOR UPDATE")
                .bind(staff_id)
                .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        }

        // Client duplicate rule: exact start-time match, not interval overlap.
        let duplicates: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE client_id = $1 AND start_at = $2 AND status IN ('pending', 'confirmed')"
        )
            .bind(&appointment.client_id).bind(appointment.start_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if duplicates > 0 {
            return Err(AppError::Conflict("You already have a booking at this time".to_string()));
        }

        // Staff rule: half-open interval overlap against pending/confirmed rows.
        if let Some(staff_id) = &appointment.staff_id {
            let overlaps: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM appointments WHERE staff_id = $1 AND status IN ('pending', 'confirmed') AND start_at < $2 AND end_at > $3"
            )
                .bind(staff_id).bind(appointment.end_at).bind(appointment.start_at)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            if overlaps > 0 {
                return Err(AppError::Conflict("This therapist is already booked during that time".to_string()));
            }
        }

        let created = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, salon_id, client_id, staff_id, service_id, start_at, end_at, status, notes, points_redeemed, price, duration_mins, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.salon_id).bind(&appointment.client_id)
            .bind(&appointment.staff_id).bind(&appointment.service_id)
            .bind(appointment.start_at).bind(appointment.end_at).bind(&appointment.status)
            .bind(&appointment.notes).bind(appointment.points_redeemed)
            .bind(appointment.price).bind(appointment.duration_mins).bind(appointment.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        if let Some(entry) = redemption {
            let requested = -entry.amount;
            let balance: Option<i64> = sqlx::query_scalar("SELECT balance FROM loyalty_accounts WHERE id = $1 FOR UPDATE")
                .bind(&entry.account_id)
                .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
            let balance = balance.ok_or(AppError::NotFound("Loyalty account not found".to_string()))?;
            if balance < requested {
                return Err(AppError::InsufficientBalance { requested, balance });
            }

            sqlx::query("UPDATE loyalty_accounts SET balance = balance + $1, last_activity_at = $2 WHERE id = $3")
                .bind(entry.amount).bind(entry.created_at).bind(&entry.account_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;

            sqlx::query(
                "INSERT INTO points_transactions (id, account_id, appointment_id, tx_type, amount, description, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)"
            )
                .bind(&entry.id).bind(&entry.account_id).bind(&entry.appointment_id)
                .bind(&entry.tx_type).bind(entry.amount).bind(&entry.description).bind(entry.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE salon_id = $1 AND id = $2")
            .bind(salon_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_filtered(&self, salon_id: &str, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM appointments WHERE salon_id = ");
        qb.push_bind(salon_id);
        if let Some(from) = filter.from {
            qb.push(" AND start_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND start_at < ").push_bind(to);
        }
        if let Some(status) = &filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(staff_id) = &filter.staff_id {
            qb.push(" AND staff_id = ").push_bind(staff_id);
        }
        if let Some(client_id) = &filter.client_id {
            qb.push(" AND client_id = ").push_bind(client_id);
        }
        qb.push(" ORDER BY start_at ASC");

        qb.build_query_as::<Appointment>().fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn transition(
        &self,
        salon_id: &str,
        id: &str,
        new_status: &str,
        allowed_from: &[&str],
        credits: &[PointsTransaction],
    ) -> Result<Option<Appointment>, AppError> {
        let placeholders = (0..allowed_from.len())
            .map(|i| format!("${}", i + 4))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE appointments SET status = $1 WHERE salon_id = $2 AND id = $3 AND status IN ({}) RETURNING *",
            placeholders
        );

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut query = sqlx::query_as::<_, Appointment>(&sql)
            .bind(new_status).bind(salon_id).bind(id);
        for status in allowed_from {
            query = query.bind(*status);
        }
        let updated = query.fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        // Ledger entries only when the CAS wins, inside the same transaction.
        if updated.is_some() {
            for entry in credits {
                let lifetime_increment = if is_earning_type(&entry.tx_type) { entry.amount } else { 0 };
                let touched = sqlx::query(
                    "UPDATE loyalty_accounts SET balance = balance + $1, lifetime_earned = lifetime_earned + $2, last_activity_at = $3 WHERE id = $4"
                )
                    .bind(entry.amount).bind(lifetime_increment).bind(entry.created_at).bind(&entry.account_id)
                    .execute(&mut *tx).await.map_err(AppError::Database)?;
                if touched.rows_affected() == 0 {
                    return Err(AppError::NotFound("Loyalty account not found".to_string()));
                }

                sqlx::query(
                    "INSERT INTO points_transactions (id, account_id, appointment_id, tx_type, amount, description, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)"
                )
                    .bind(&entry.id).bind(&entry.account_id).bind(&entry.appointment_id)
                    .bind(&entry.tx_type).bind(entry.amount).bind(&entry.description).bind(entry.created_at)
                    .execute(&mut *tx).await.map_err(AppError::Database)?;
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn has_recent_completed(
        &self,
        salon_id: &str,
        client_id: &str,
        exclude_id: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE salon_id = $1 AND client_id = $2 AND status = 'completed' AND id != $3 AND start_at >= $4"
        )
            .bind(salon_id).bind(client_id).bind(exclude_id).bind(since)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(count > 0)
    }

    async fn list_active_for_staff(
        &self,
        staff_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE staff_id = $1 AND status IN ('pending', 'confirmed') AND start_at < $2 AND end_at > $3 ORDER BY start_at ASC"
        )
            .bind(staff_id).bind(to).bind(from)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_recent_for_client(&self, salon_id: &str, client_id: &str, limit: i64) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE salon_id = $1 AND client_id = $2 ORDER BY start_at DESC LIMIT $3"
        )
            .bind(salon_id).bind(client_id).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn completed_revenue_since(&self, salon_id: &str, since: DateTime<Utc>) -> Result<(i64, i64), AppError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(price), 0)::BIGINT AS total, COUNT(*) AS count FROM appointments WHERE salon_id = $1 AND status = 'completed' AND start_at >= $2"
        )
            .bind(salon_id).bind(since)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok((row.get::<i64, _>("total"), row.get::<i64, _>("count")))
    }

    async fn top_services(&self, salon_id: &str, limit: i64) -> Result<Vec<ServicePopularity>, AppError> {
        sqlx::query_as::<_, ServicePopularity>(
            "SELECT a.service_id, s.name, s.category, s.price, COUNT(*) AS completed_count
             FROM appointments a
             JOIN services s ON s.id = a.service_id
             WHERE a.salon_id = $1 AND a.status = 'completed'
             GROUP BY a.service_id, s.name, s.category, s.price
             ORDER BY completed_count DESC
             LIMIT $2"
        )
            .bind(salon_id).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn status_breakdown(&self, salon_id: &str, since: DateTime<Utc>) -> Result<Vec<StatusCount>, AppError> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM appointments
             WHERE salon_id = $1 AND start_at >= $2
             GROUP BY status
             ORDER BY count DESC"
        )
            .bind(salon_id).bind(since)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn staff_performance(&self, salon_id: &str, since: DateTime<Utc>) -> Result<Vec<StaffProduction>, AppError> {
        sqlx::query_as::<_, StaffProduction>(
            "SELECT a.staff_id, u.name, COUNT(*) AS completed_count, COALESCE(SUM(a.price), 0)::BIGINT AS revenue
             FROM appointments a
             JOIN staff st ON st.id = a.staff_id
             JOIN users u ON u.id = st.user_id
             WHERE a.salon_id = $1 AND a.status = 'completed' AND a.start_at >= $2 AND a.staff_id IS NOT NULL
             GROUP BY a.staff_id, u.name
             ORDER BY completed_count DESC"
        )
            .bind(salon_id).bind(since)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
