//! Modelo del audit log
//!
//! Registro append-only de cada transición observable: completados y
//! limpiezas de etapas, altas/cambios/archivado de vehículos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Entrada del audit log - mapea exactamente a la tabla audit_log
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEntry {
    pub id: Uuid,
    pub dealership_id: Uuid,
    pub user_name: Option<String>,
    pub user_role: Option<String>,
    pub action: String,
    pub vehicle_desc: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub field_name: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entrada nueva, aún sin id ni timestamp
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub dealership_id: Uuid,
    pub user_name: Option<String>,
    pub user_role: Option<String>,
    pub action: String,
    pub vehicle_desc: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub field_name: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}
