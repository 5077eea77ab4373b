//! Middleware de identificación del usuario
//!
//! El cliente manda el id de usuario devuelto por el login en la
//! cabecera `x-user-id`. El middleware verifica que el usuario existe y
//! está activo, y lo inyecta en las extensions. El chequeo de rol por
//! etapa ocurre después, en el servidor, con el filtro de acceso
//! (services::access): la capa de presentación ya no es el único punto
//! de control.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::services::access;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Cabecera con el id del usuario que actúa
pub const USER_ID_HEADER: &str = "x-user-id";

/// Usuario identificado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct ActingUser {
    pub id: Uuid,
    pub dealership_id: Uuid,
    pub name: String,
    pub roles: Vec<String>,
}

impl ActingUser {
    pub fn is_manager(&self) -> bool {
        access::is_manager(&self.roles)
    }
}

/// Middleware de identificación: resuelve `x-user-id` contra la tabla users
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let raw_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Cabecera x-user-id requerida".to_string()))?;

    let user_id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

    let user = sqlx::query_as::<_, crate::models::user::User>(
        "SELECT id, dealership_id, name, pin, roles, active, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if !user.active {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    let acting_user = ActingUser {
        id: user.id,
        dealership_id: user.dealership_id,
        name: user.name,
        roles: user.roles,
    };

    request.extensions_mut().insert(acting_user);

    Ok(next.run(request).await)
}

/// Middleware para rutas de administración: solo Manager
pub async fn manager_only_middleware(
    Extension(user): Extension<ActingUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_manager() {
        return Err(AppError::Forbidden(
            "Se requiere el rol Manager".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
