use sqlx::PgPool;
use uuid::Uuid;

use crate::models::audit::AuditEntry;
use crate::utils::errors::AppError;

pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Entradas más recientes primero
    pub async fn list_recent(
        &self,
        dealership_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, AppError> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, dealership_id, user_name, user_role, action, vehicle_desc, vehicle_id, field_name, old_value, new_value, created_at
            FROM audit_log
            WHERE dealership_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(dealership_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
