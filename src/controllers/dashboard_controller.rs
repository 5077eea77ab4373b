use chrono::Utc;
use sqlx::PgPool;

use crate::dto::dashboard_dto::{DashboardSummary, RoleWorkloadResponse};
use crate::middleware::auth::ActingUser;
use crate::repositories::completion_repository::CompletionRepository;
use crate::repositories::stage_repository::StageRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::pipeline_engine;
use crate::utils::errors::AppError;

pub struct DashboardController {
    vehicles: VehicleRepository,
    stages: StageRepository,
    completions: CompletionRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            stages: StageRepository::new(pool.clone()),
            completions: CompletionRepository::new(pool),
        }
    }

    /// Resumen de la flota activa: SLA global, métricas por etapa,
    /// distribución por antigüedad y carga por rol. Todo derivado en
    /// una sola pasada sobre el snapshot completo.
    pub async fn summary(&self, acting: &ActingUser) -> Result<DashboardSummary, AppError> {
        let vehicles = self.vehicles.list(acting.dealership_id, false).await?;
        let stages = self.stages.list(acting.dealership_id).await?;
        let completions = self
            .completions
            .list_for_dealership(acting.dealership_id)
            .await?;

        let now = Utc::now();

        let sla_compliance =
            pipeline_engine::fleet_sla_compliance(&vehicles, &stages, &completions, now);

        let stage_metrics = pipeline_engine::stage_metrics(&vehicles, &stages, &completions, now)
            .into_iter()
            .map(Into::into)
            .collect();

        let aging = pipeline_engine::aging_buckets(&vehicles, now).into();

        // Roles en orden de aparición en el pipeline, sin duplicados
        let mut role_names: Vec<String> = Vec::new();
        for stage in pipeline_engine::ordered_stages(&stages) {
            if !role_names.contains(&stage.role) {
                role_names.push(stage.role.clone());
            }
        }

        let roles = role_names
            .into_iter()
            .map(|role| RoleWorkloadResponse {
                count: pipeline_engine::role_workload(&role, &vehicles, &stages, &completions),
                role,
            })
            .collect();

        Ok(DashboardSummary {
            total_vehicles: vehicles.len(),
            sla_compliance,
            stages: stage_metrics,
            aging,
            roles,
        })
    }
}
