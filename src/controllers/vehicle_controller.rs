use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleDetailResponse, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::ActingUser;
use crate::models::audit::NewAuditEntry;
use crate::models::completion::StageCompletion;
use crate::models::stage::PipelineStage;
use crate::models::vehicle::Vehicle;
use crate::repositories::completion_repository::CompletionRepository;
use crate::repositories::stage_repository::StageRepository;
use crate::repositories::vehicle_repository::{NewVehicle, VehicleRepository};
use crate::services::audit_service::{record_best_effort, AuditSink};
use crate::services::pipeline_engine;
use crate::services::vin_service::VinDecoder;
use crate::utils::errors::{conflict_error, AppError};

pub struct VehicleController {
    vehicles: VehicleRepository,
    stages: StageRepository,
    completions: CompletionRepository,
    vin_decoder: VinDecoder,
    audit: Arc<dyn AuditSink>,
}

impl VehicleController {
    pub fn new(pool: PgPool, vin_decoder: VinDecoder, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            stages: StageRepository::new(pool.clone()),
            completions: CompletionRepository::new(pool),
            vin_decoder,
            audit,
        }
    }

    pub async fn create(
        &self,
        acting: &ActingUser,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let mut fields = NewVehicle {
            stock_num: request.stock_num,
            year: request.year,
            make: request.make,
            model: request.model,
            vin: None,
            notes: request.notes,
            ro_num: request.ro_num,
            estimate: request.estimate,
        };

        if let Some(vin) = request.vin {
            let vin = vin.trim().to_uppercase();

            if self.vehicles.vin_exists(&vin, acting.dealership_id).await? {
                return Err(conflict_error("Vehicle", "vin", &vin));
            }

            // Enriquecer año/marca/modelo vía vPIC; si falla, el alta
            // sigue con lo tecleado a mano
            if fields.year.is_none() || fields.make.is_none() || fields.model.is_none() {
                if let Some(decoded) = self.vin_decoder.decode(&vin).await {
                    fields.year = fields.year.or(decoded.year);
                    fields.make = fields.make.or(decoded.make);
                    fields.model = fields.model.or(decoded.model);
                }
            }

            fields.vin = Some(vin);
        }

        let vehicle = self.vehicles.create(acting.dealership_id, fields).await?;

        record_best_effort(
            self.audit.clone(),
            NewAuditEntry {
                dealership_id: acting.dealership_id,
                user_name: Some(acting.name.clone()),
                user_role: Some(acting.roles.join(",")),
                action: "vehicle_added".to_string(),
                vehicle_desc: Some(vehicle.description()),
                vehicle_id: Some(vehicle.id),
                field_name: None,
                old_value: None,
                new_value: None,
            },
        );

        let stages = self.stages.list(acting.dealership_id).await?;
        let response = to_response(vehicle, &stages, &[]);

        Ok(ApiResponse::success_with_message(
            response,
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn list(
        &self,
        acting: &ActingUser,
        include_archived: bool,
    ) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self
            .vehicles
            .list(acting.dealership_id, include_archived)
            .await?;
        let stages = self.stages.list(acting.dealership_id).await?;
        let completions = self
            .completions
            .list_for_dealership(acting.dealership_id)
            .await?;

        Ok(vehicles
            .into_iter()
            .map(|v| to_response(v, &stages, &completions))
            .collect())
    }

    pub async fn get_by_id(
        &self,
        acting: &ActingUser,
        id: Uuid,
    ) -> Result<VehicleDetailResponse, AppError> {
        let vehicle = self.owned_vehicle(acting, id).await?;

        let stages = self.stages.list(acting.dealership_id).await?;
        let completions = self.completions.list_for_vehicle(id).await?;
        let response = to_response(vehicle, &stages, &completions);

        Ok(VehicleDetailResponse {
            vehicle: response,
            completions,
        })
    }

    pub async fn update(
        &self,
        acting: &ActingUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .vehicles
            .update(
                id,
                acting.dealership_id,
                request.stock_num,
                request.year,
                request.make,
                request.model,
                request.vin.map(|v| v.trim().to_uppercase()),
                request.notes,
                request.ro_num,
                request.estimate,
                request.actual,
            )
            .await?;

        record_best_effort(
            self.audit.clone(),
            NewAuditEntry {
                dealership_id: acting.dealership_id,
                user_name: Some(acting.name.clone()),
                user_role: Some(acting.roles.join(",")),
                action: "vehicle_updated".to_string(),
                vehicle_desc: Some(vehicle.description()),
                vehicle_id: Some(vehicle.id),
                field_name: None,
                old_value: None,
                new_value: None,
            },
        );

        let stages = self.stages.list(acting.dealership_id).await?;
        let completions = self.completions.list_for_vehicle(id).await?;
        let response = to_response(vehicle, &stages, &completions);

        Ok(ApiResponse::success_with_message(
            response,
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    /// Soft delete: el vehículo sale de las vistas activas pero la fila
    /// y su historial de completados se conservan
    pub async fn set_archived(
        &self,
        acting: &ActingUser,
        id: Uuid,
        archived: bool,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let vehicle = self
            .vehicles
            .set_archived(id, acting.dealership_id, archived)
            .await?;

        let action = if archived {
            "vehicle_archived"
        } else {
            "vehicle_restored"
        };

        record_best_effort(
            self.audit.clone(),
            NewAuditEntry {
                dealership_id: acting.dealership_id,
                user_name: Some(acting.name.clone()),
                user_role: Some(acting.roles.join(",")),
                action: action.to_string(),
                vehicle_desc: Some(vehicle.description()),
                vehicle_id: Some(vehicle.id),
                field_name: None,
                old_value: None,
                new_value: None,
            },
        );

        let stages = self.stages.list(acting.dealership_id).await?;
        let completions = self.completions.list_for_vehicle(id).await?;
        let response = to_response(vehicle, &stages, &completions);

        let message = if archived {
            "Vehículo archivado".to_string()
        } else {
            "Vehículo restaurado".to_string()
        };

        Ok(ApiResponse::success_with_message(response, message))
    }

    async fn owned_vehicle(&self, acting: &ActingUser, id: Uuid) -> Result<Vehicle, AppError> {
        let vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.dealership_id != acting.dealership_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este concesionario".to_string(),
            ));
        }

        Ok(vehicle)
    }
}

/// Derivar estado/edad/SLA con el motor de pipeline y armar la response
fn to_response(
    vehicle: Vehicle,
    stages: &[PipelineStage],
    completions: &[StageCompletion],
) -> VehicleResponse {
    let now = Utc::now();
    let current = pipeline_engine::current_stage(vehicle.id, stages, completions);

    let status = current
        .map(|s| s.stage_name.clone())
        .unwrap_or_else(|| pipeline_engine::PENDING_STATUS.to_string());
    let age_days = pipeline_engine::age_in_days(&vehicle, now);
    let overdue = current.map_or(false, |s| pipeline_engine::is_overdue(&vehicle, s, now));

    VehicleResponse::from_vehicle(vehicle, status, age_days, overdue)
}
