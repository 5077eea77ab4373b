//! Modelo de User
//!
//! Usuarios del concesionario. El login es por PIN y los roles son
//! etiquetas planas (Manager, Service, Detail, Sales) almacenadas
//! como TEXT[] en PostgreSQL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub dealership_id: Uuid,
    pub name: String,
    pub pin: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Response de usuario para la API (sin PIN)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub dealership_id: Uuid,
    pub name: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            dealership_id: user.dealership_id,
            name: user.name,
            roles: user.roles,
            active: user.active,
            created_at: user.created_at,
        }
    }
}
