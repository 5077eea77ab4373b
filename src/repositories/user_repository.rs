use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::errors::AppError;

const COLUMNS: &str = "id, dealership_id, name, pin, roles, active, created_at";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Login por PIN: solo usuarios activos
    pub async fn find_active_by_pin(&self, pin: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE pin = $1 AND active = true LIMIT 1"
        ))
        .bind(pin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list(&self, dealership_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE dealership_id = $1 ORDER BY created_at DESC"
        ))
        .bind(dealership_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// El PIN es la credencial completa: dos usuarios activos con el
    /// mismo PIN harían el login ambiguo
    pub async fn pin_exists(
        &self,
        pin: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE pin = $1 AND active = true AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(pin)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn create(
        &self,
        dealership_id: Uuid,
        name: String,
        pin: String,
        roles: Vec<String>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, dealership_id, name, pin, roles, active, created_at)
            VALUES ($1, $2, $3, $4, $5, true, NOW())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(dealership_id)
        .bind(name)
        .bind(pin)
        .bind(roles)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dealership_id: Uuid,
        name: Option<String>,
        pin: Option<String>,
        roles: Option<Vec<String>>,
    ) -> Result<User, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        if current.dealership_id != dealership_id {
            return Err(AppError::Forbidden(
                "El usuario no pertenece a este concesionario".to_string(),
            ));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET name = $2, pin = $3, roles = $4
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name.unwrap_or(current.name))
        .bind(pin.unwrap_or(current.pin))
        .bind(roles.unwrap_or(current.roles))
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Activar/desactivar: nunca se borran usuarios
    pub async fn set_active(
        &self,
        id: Uuid,
        dealership_id: Uuid,
        active: bool,
    ) -> Result<User, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        if current.dealership_id != dealership_id {
            return Err(AppError::Forbidden(
                "El usuario no pertenece a este concesionario".to_string(),
            ));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET active = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(active)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
