use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::completion::StageCompletion;

/// Request para completar o limpiar una etapa.
/// Valor vacío = limpiar (la fila se conserva con cleared_at estampado).
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyCompletionRequest {
    #[validate(length(max = 200))]
    pub value: String,
}

/// Response de una transición de completado
#[derive(Debug, Serialize)]
pub struct CompletionUpdateResponse {
    pub vehicle_id: Uuid,
    pub stage_id: Uuid,
    /// La fila viva tras la transición; None cuando limpiar fue un no-op
    pub completion: Option<StageCompletion>,
    /// Estado del vehículo re-derivado tras la transición
    pub current_status: String,
}
