//! Audit sink
//!
//! Interfaz append-only para el registro de auditoría. Las escrituras
//! son best-effort: se despachan en background y un fallo se registra
//! en el log sin interrumpir la operación que las originó.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::audit::NewAuditEntry;
use crate::utils::errors::AppError;

/// Sink de auditoría append-only
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> Result<(), AppError>;
}

/// Implementación sobre la tabla audit_log de PostgreSQL
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, entry: NewAuditEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, dealership_id, user_name, user_role, action, vehicle_desc, vehicle_id, field_name, old_value, new_value, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.dealership_id)
        .bind(entry.user_name)
        .bind(entry.user_role)
        .bind(entry.action)
        .bind(entry.vehicle_desc)
        .bind(entry.vehicle_id)
        .bind(entry.field_name)
        .bind(entry.old_value)
        .bind(entry.new_value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Despachar una entrada sin esperar el resultado. Un fallo de escritura
/// queda en el log del servidor; la operación original ya respondió.
pub fn record_best_effort(sink: Arc<dyn AuditSink>, entry: NewAuditEntry) {
    tokio::spawn(async move {
        let action = entry.action.clone();
        if let Err(e) = sink.record(entry).await {
            tracing::warn!("Fallo escribiendo audit log ({}): {}", action, e);
        }
    });
}
