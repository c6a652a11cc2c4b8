use crate::domain::models::service::Service;
use crate::domain::ports::ServiceRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresServiceRepo {
    pool: PgPool,
}

impl PostgresServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "INSERT INTO services (id, salon_id, name, category, duration_mins, price, description, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&service.id).bind(&service.salon_id).bind(&service.name).bind(&service.category)
            .bind(service.duration_mins).bind(service.price).bind(&service.description)
            .bind(service.is_active).bind(service.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE salon_id = $1 AND id = $2")
            .bind(salon_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active(&self, salon_id: &str) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE salon_id = $1 AND is_active = TRUE ORDER BY category ASC, name ASC"
        )
            .bind(salon_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET name = $1, category = $2, duration_mins = $3, price = $4, description = $5, is_active = $6
             WHERE id = $7 AND salon_id = $8
             RETURNING *"
        )
            .bind(&service.name).bind(&service.category).bind(service.duration_mins).bind(service.price)
            .bind(&service.description).bind(service.is_active)
            .bind(&service.id).bind(&service.salon_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
