//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD
//! operations. El estado actual del pipeline y la edad NO se almacenan:
//! se derivan siempre con el motor de pipeline (services::pipeline_engine).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Descripción corta para el audit log ("2021 Chevrolet Equinox")
    pub fn description(&self) -> String {
        let parts: Vec<&str> = [
            self.year.as_deref(),
            self.make.as_deref(),
            self.model.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            self.stock_num.clone().unwrap_or_else(|| self.id.to_string())
        } else {
            parts.join(" ")
        }
    }
}
