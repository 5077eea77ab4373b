use sqlx::PgPool;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::repositories::dealership_repository::DealershipRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;

pub struct AuthController {
    users: UserRepository,
    dealerships: DealershipRepository,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            dealerships: DealershipRepository::new(pool),
        }
    }

    /// Login por PIN: lookup directo contra usuarios activos.
    /// No hay hashing ni tokens de sesión; el PIN es la credencial
    /// completa, igual que en el resto del sistema.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let user = self
            .users
            .find_active_by_pin(&request.pin)
            .await?
            .ok_or_else(|| AppError::Unauthorized("PIN incorrecto".to_string()))?;

        let dealership = self.dealerships.find_by_id(user.dealership_id).await?;

        tracing::info!("Login de '{}' ({:?})", user.name, user.roles);

        Ok(LoginResponse {
            user: user.into(),
            dealership,
        })
    }
}
