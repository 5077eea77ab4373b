use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::completion_dto::{ApplyCompletionRequest, CompletionUpdateResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::ActingUser;
use crate::models::audit::NewAuditEntry;
use crate::models::completion::StageCompletion;
use crate::repositories::completion_repository::CompletionRepository;
use crate::repositories::stage_repository::StageRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::audit_service::{record_best_effort, AuditSink};
use crate::services::pipeline_engine::{self, CompletionTransition};
use crate::services::access;
use crate::utils::errors::AppError;

pub struct CompletionController {
    stages: StageRepository,
    vehicles: VehicleRepository,
    completions: CompletionRepository,
    audit: Arc<dyn AuditSink>,
}

impl CompletionController {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            stages: StageRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            completions: CompletionRepository::new(pool),
            audit,
        }
    }

    /// Completar o limpiar una etapa de un vehículo.
    ///
    /// El chequeo de rol ocurre aquí, en el servidor, antes de escribir:
    /// la visibilidad del campo en el cliente no es el punto de control.
    pub async fn apply(
        &self,
        acting: &ActingUser,
        vehicle_id: Uuid,
        stage_id: Uuid,
        request: ApplyCompletionRequest,
    ) -> Result<ApiResponse<CompletionUpdateResponse>, AppError> {
        request.validate()?;

        let stage = self
            .stages
            .find_by_id(stage_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Etapa no encontrada".to_string()))?;

        if stage.dealership_id != acting.dealership_id {
            return Err(AppError::Forbidden(
                "La etapa no pertenece a este concesionario".to_string(),
            ));
        }

        if !access::can_access_stage(&acting.roles, &stage) {
            return Err(AppError::Forbidden(format!(
                "La etapa '{}' requiere el rol {}",
                stage.stage_name, stage.role
            )));
        }

        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.dealership_id != acting.dealership_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este concesionario".to_string(),
            ));
        }

        let now = Utc::now();
        let existing = self.completions.find(vehicle_id, stage_id).await?;
        let old_value = existing.as_ref().and_then(|c| c.completion_value.clone());

        let transition = pipeline_engine::plan_completion_transition(
            existing.as_ref(),
            &request.value,
            &acting.name,
            now,
        );

        let completion = self
            .completions
            .persist_transition(vehicle_id, stage_id, existing.as_ref(), &transition)
            .await?;

        match &transition {
            CompletionTransition::Complete { value, .. } => {
                self.record_transition(
                    acting,
                    &vehicle,
                    &stage.completion_field,
                    "stage_completed",
                    old_value,
                    Some(value.clone()),
                );
            }
            CompletionTransition::Clear { .. } => {
                self.record_transition(
                    acting,
                    &vehicle,
                    &stage.completion_field,
                    "stage_cleared",
                    old_value,
                    None,
                );
            }
            CompletionTransition::Noop => {}
        }

        // Re-derivar el estado con el set completo de completados
        let stages = self.stages.list(acting.dealership_id).await?;
        let completions = self.completions.list_for_vehicle(vehicle_id).await?;
        let current_status =
            pipeline_engine::current_status_name(vehicle_id, &stages, &completions);

        Ok(ApiResponse::success(CompletionUpdateResponse {
            vehicle_id,
            stage_id,
            completion,
            current_status,
        }))
    }

    pub async fn list_for_vehicle(
        &self,
        acting: &ActingUser,
        vehicle_id: Uuid,
    ) -> Result<Vec<StageCompletion>, AppError> {
        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.dealership_id != acting.dealership_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este concesionario".to_string(),
            ));
        }

        self.completions.list_for_vehicle(vehicle_id).await
    }

    fn record_transition(
        &self,
        acting: &ActingUser,
        vehicle: &crate::models::vehicle::Vehicle,
        field_name: &str,
        action: &str,
        old_value: Option<String>,
        new_value: Option<String>,
    ) {
        record_best_effort(
            self.audit.clone(),
            NewAuditEntry {
                dealership_id: acting.dealership_id,
                user_name: Some(acting.name.clone()),
                user_role: Some(acting.roles.join(",")),
                action: action.to_string(),
                vehicle_desc: Some(vehicle.description()),
                vehicle_id: Some(vehicle.id),
                field_name: Some(field_name.to_string()),
                old_value,
                new_value,
            },
        );
    }
}
