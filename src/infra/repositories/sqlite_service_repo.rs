use crate::domain::models::service::Service;
use crate::domain::ports::ServiceRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteServiceRepo {
    pool: SqlitePool,
}

impl SqliteServiceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "INSERT INTO services (id, salon_id, name, category, duration_mins, price, description, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&service.id).bind(&service.salon_id).bind(&service.name).bind(&service.category)
            .bind(service.duration_mins).bind(service.price).bind(&service.description)
            .bind(service.is_active).bind(service.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE salon_id = ? AND id = ?")
            .bind(salon_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active(&self, salon_id: &str) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE salon_id = ? AND is_active = 1 ORDER BY category ASC, name ASC"
        )
            .bind(salon_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET name = ?, category = ?, duration_mins = ?, price = ?, description = ?, is_active = ?
             WHERE id = ? AND salon_id = ?
             RETURNING *"
        )
            .bind(&service.name).bind(&service.category).bind(service.duration_mins).bind(service.price)
            .bind(&service.description).bind(service.is_active)
            .bind(&service.id).bind(&service.salon_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
