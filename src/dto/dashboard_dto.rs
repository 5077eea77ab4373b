use serde::Serialize;
use uuid::Uuid;

use crate::services::pipeline_engine::{AgingBuckets, StageMetrics};

/// Métricas de una etapa para el dashboard
#[derive(Debug, Serialize)]
pub struct StageMetricsResponse {
    pub stage_id: Uuid,
    pub stage_name: String,
    pub stage_color: String,
    pub count: usize,
    pub avg_age_days: i64,
    pub overdue_count: usize,
}

impl From<StageMetrics> for StageMetricsResponse {
    fn from(m: StageMetrics) -> Self {
        Self {
            stage_id: m.stage_id,
            stage_name: m.stage_name,
            stage_color: m.stage_color,
            count: m.count,
            avg_age_days: m.avg_age_days,
            overdue_count: m.overdue_count,
        }
    }
}

/// Distribución por antigüedad
#[derive(Debug, Serialize)]
pub struct AgingResponse {
    pub zero_to_three: usize,
    pub four_to_seven: usize,
    pub eight_to_fourteen: usize,
    pub fifteen_plus: usize,
}

impl From<AgingBuckets> for AgingResponse {
    fn from(b: AgingBuckets) -> Self {
        Self {
            zero_to_three: b.zero_to_three,
            four_to_seven: b.four_to_seven,
            eight_to_fourteen: b.eight_to_fourteen,
            fifteen_plus: b.fifteen_plus,
        }
    }
}

/// Carga de trabajo por rol
#[derive(Debug, Serialize)]
pub struct RoleWorkloadResponse {
    pub role: String,
    pub count: usize,
}

/// Resumen completo del dashboard
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_vehicles: usize,
    pub sla_compliance: u32,
    pub stages: Vec<StageMetricsResponse>,
    pub aging: AgingResponse,
    pub roles: Vec<RoleWorkloadResponse>,
}
