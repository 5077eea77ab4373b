//! Modelo de PipelineStage
//!
//! Etapas configurables del pipeline de reacondicionamiento. El campo
//! `order_num` define el orden total del pipeline dentro de un
//! concesionario y la etapa con `is_terminal` representa "listo para
//! la venta".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de campo de completado de una etapa
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Checkbox,
    Dropdown,
}

/// Etapa del pipeline - mapea exactamente a la tabla pipeline_stages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PipelineStage {
    pub id: Uuid,
    pub dealership_id: Uuid,
    pub order_num: i32,
    pub stage_name: String,
    pub role: String,
    pub completion_field: String,
    pub completion_type: CompletionKind,
    pub list_name: Option<String>,
    // Umbral SLA en horas; sin valor no hay SLA para la etapa
    pub target_hours: Option<i32>,
    pub stage_color: String,
    pub is_terminal: bool,
    pub created_at: DateTime<Utc>,
}
