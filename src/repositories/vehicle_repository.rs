use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

const COLUMNS: &str = "id, dealership_id, stock_num, year, make, model, vin, in_system_date, notes, ro_num, estimate, actual, archived, created_at, updated_at";

/// Campos descriptivos de un alta de vehículo, ya enriquecidos (VIN decode)
#[derive(Debug, Clone, Default)]
pub struct NewVehicle {
    pub stock_num: Option<String>,
    pub year: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub vin: Option<String>,
    pub notes: Option<String>,
    pub ro_num: Option<String>,
    pub estimate: Option<Decimal>,
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        dealership_id: Uuid,
        fields: NewVehicle,
    ) -> Result<Vehicle, AppError> {
        let now = Utc::now();

        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles (id, dealership_id, stock_num, year, make, model, vin, in_system_date, notes, ro_num, estimate, actual, archived, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NULL, false, $8, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(dealership_id)
        .bind(fields.stock_num)
        .bind(fields.year)
        .bind(fields.make)
        .bind(fields.model)
        .bind(fields.vin)
        .bind(now)
        .bind(fields.notes.unwrap_or_default())
        .bind(fields.ro_num)
        .bind(fields.estimate)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {COLUMNS} FROM vehicles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn list(
        &self,
        dealership_id: Uuid,
        include_archived: bool,
    ) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            SELECT {COLUMNS} FROM vehicles
            WHERE dealership_id = $1 AND (archived = false OR $2)
            ORDER BY in_system_date DESC
            "#
        ))
        .bind(dealership_id)
        .bind(include_archived)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn vin_exists(&self, vin: &str, dealership_id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE vin = $1 AND dealership_id = $2 AND archived = false)",
        )
        .bind(vin)
        .bind(dealership_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dealership_id: Uuid,
        stock_num: Option<String>,
        year: Option<String>,
        make: Option<String>,
        model: Option<String>,
        vin: Option<String>,
        notes: Option<String>,
        ro_num: Option<String>,
        estimate: Option<Decimal>,
        actual: Option<Decimal>,
    ) -> Result<Vehicle, AppError> {
        // Obtener vehículo actual
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        // Verificar que pertenece al concesionario
        if current.dealership_id != dealership_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este concesionario".to_string(),
            ));
        }

        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles
            SET stock_num = $2, year = $3, make = $4, model = $5, vin = $6, notes = $7, ro_num = $8, estimate = $9, actual = $10, updated_at = $11
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(stock_num.or(current.stock_num))
        .bind(year.or(current.year))
        .bind(make.or(current.make))
        .bind(model.or(current.model))
        .bind(vin.or(current.vin))
        .bind(notes.unwrap_or(current.notes))
        .bind(ro_num.or(current.ro_num))
        .bind(estimate.or(current.estimate))
        .bind(actual.or(current.actual))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Archivar o restaurar (soft delete, nunca se borra la fila)
    pub async fn set_archived(
        &self,
        id: Uuid,
        dealership_id: Uuid,
        archived: bool,
    ) -> Result<Vehicle, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if current.dealership_id != dealership_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este concesionario".to_string(),
            ));
        }

        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles SET archived = $2, updated_at = $3
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(archived)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }
}
