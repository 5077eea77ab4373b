use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::completion::StageCompletion;
use crate::models::vehicle::Vehicle;

/// Request para dar de alta un vehículo.
///
/// Con un VIN presente y año/marca/modelo ausentes, el alta intenta
/// rellenarlos vía vPIC; si la decodificación falla quedan en manual.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 50))]
    pub stock_num: Option<String>,

    #[validate(length(min = 4, max = 4))]
    pub year: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_vin")]
    pub vin: Option<String>,

    pub notes: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub ro_num: Option<String>,

    pub estimate: Option<Decimal>,
}

/// Request para actualizar campos descriptivos de un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 50))]
    pub stock_num: Option<String>,

    #[validate(length(min = 4, max = 4))]
    pub year: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_vin")]
    pub vin: Option<String>,

    pub notes: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub ro_num: Option<String>,

    pub estimate: Option<Decimal>,
    pub actual: Option<Decimal>,
}

/// Filtros del listado de vehículos
#[derive(Debug, Deserialize)]
pub struct VehicleFilters {
    pub include_archived: Option<bool>,
}

/// Response de vehículo con su estado derivado
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub dealership_id: Uuid,
    pub stock_num: Option<String>,
    pub year: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub vin: Option<String>,
    pub in_system_date: DateTime<Utc>,
    pub notes: String,
    pub ro_num: Option<String>,
    pub estimate: Option<Decimal>,
    pub actual: Option<Decimal>,
    pub archived: bool,
    // derivados por el motor de pipeline, nunca almacenados
    pub current_status: String,
    pub age_days: i64,
    pub overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, current_status: String, age_days: i64, overdue: bool) -> Self {
        Self {
            id: vehicle.id,
            dealership_id: vehicle.dealership_id,
            stock_num: vehicle.stock_num,
            year: vehicle.year,
            make: vehicle.make,
            model: vehicle.model,
            vin: vehicle.vin,
            in_system_date: vehicle.in_system_date,
            notes: vehicle.notes,
            ro_num: vehicle.ro_num,
            estimate: vehicle.estimate,
            actual: vehicle.actual,
            archived: vehicle.archived,
            current_status,
            age_days,
            overdue,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

/// Response de detalle: el vehículo más sus completados
#[derive(Debug, Serialize)]
pub struct VehicleDetailResponse {
    #[serde(flatten)]
    pub vehicle: VehicleResponse,
    pub completions: Vec<StageCompletion>,
}
