use sqlx::PgPool;
use uuid::Uuid;

use crate::models::dealership::Dealership;
use crate::utils::errors::AppError;

pub struct DealershipRepository {
    pool: PgPool,
}

impl DealershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Dealership>, AppError> {
        let dealership = sqlx::query_as::<_, Dealership>(
            "SELECT id, name, created_at FROM dealerships WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dealership)
    }
}
