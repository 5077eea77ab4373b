//! Modelo de Dealership

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Concesionario - mapea a la tabla dealerships
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dealership {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
