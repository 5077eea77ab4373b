//! Modelo de DropdownList
//!
//! Listas de valores con nombre (Detailers, Advisors, Technicians) que
//! alimentan las etapas con completion_type = dropdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lista desplegable - mapea exactamente a la tabla dropdown_lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DropdownList {
    pub id: Uuid,
    pub dealership_id: Uuid,
    pub list_name: String,
    pub values: Vec<String>,
    pub created_at: DateTime<Utc>,
}
