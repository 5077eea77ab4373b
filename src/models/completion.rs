//! Modelo de StageCompletion
//!
//! Relación dispersa (vehicle_id, stage_id) con el registro de quién
//! y cuándo completó una etapa. Limpiar una etapa NO borra la fila:
//! se anulan value/completed_at y se estampa cleared_at, preservando
//! el historial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Completado de etapa - mapea exactamente a la tabla stage_completions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StageCompletion {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub stage_id: Uuid,
    pub completion_value: Option<String>,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cleared_at: Option<DateTime<Utc>>,
}

impl StageCompletion {
    /// Una etapa está satisfecha si tiene valor no vacío y no fue limpiada
    pub fn is_satisfied(&self) -> bool {
        self.cleared_at.is_none()
            && self
                .completion_value
                .as_deref()
                .map_or(false, |v| !v.is_empty())
    }
}
