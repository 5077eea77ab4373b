use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::{
    CreateDropdownRequest, CreateStageRequest, CreateUserRequest, UpdateDropdownRequest,
    UpdateStageRequest, UpdateUserRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::ActingUser;
use crate::models::audit::AuditEntry;
use crate::models::dropdown::DropdownList;
use crate::models::stage::PipelineStage;
use crate::models::user::UserResponse;
use crate::repositories::audit_repository::AuditRepository;
use crate::repositories::dropdown_repository::DropdownRepository;
use crate::repositories::stage_repository::StageRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{conflict_error, AppError};

/// CRUD de administración (usuarios, etapas, listas desplegables) y
/// lectura del audit log. Todas las rutas que llegan aquí pasan antes
/// por el middleware manager_only.
pub struct AdminController {
    users: UserRepository,
    stages: StageRepository,
    dropdowns: DropdownRepository,
    audit: AuditRepository,
}

impl AdminController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            stages: StageRepository::new(pool.clone()),
            dropdowns: DropdownRepository::new(pool.clone()),
            audit: AuditRepository::new(pool),
        }
    }

    // -----------------------------------------------------------------
    // Usuarios
    // -----------------------------------------------------------------

    pub async fn list_users(&self, acting: &ActingUser) -> Result<Vec<UserResponse>, AppError> {
        let users = self.users.list(acting.dealership_id).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn create_user(
        &self,
        acting: &ActingUser,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        if self.users.pin_exists(&request.pin, None).await? {
            return Err(conflict_error("User", "pin", "****"));
        }

        let user = self
            .users
            .create(acting.dealership_id, request.name, request.pin, request.roles)
            .await?;

        Ok(ApiResponse::success_with_message(
            user.into(),
            "Usuario creado exitosamente".to_string(),
        ))
    }

    pub async fn update_user(
        &self,
        acting: &ActingUser,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        if let Some(pin) = &request.pin {
            if self.users.pin_exists(pin, Some(id)).await? {
                return Err(conflict_error("User", "pin", "****"));
            }
        }

        let user = self
            .users
            .update(id, acting.dealership_id, request.name, request.pin, request.roles)
            .await?;

        Ok(ApiResponse::success_with_message(
            user.into(),
            "Usuario actualizado exitosamente".to_string(),
        ))
    }

    pub async fn set_user_active(
        &self,
        acting: &ActingUser,
        id: Uuid,
        active: bool,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        let user = self
            .users
            .set_active(id, acting.dealership_id, active)
            .await?;

        let message = if active {
            "Usuario activado".to_string()
        } else {
            "Usuario desactivado".to_string()
        };

        Ok(ApiResponse::success_with_message(user.into(), message))
    }

    // -----------------------------------------------------------------
    // Etapas del pipeline
    // -----------------------------------------------------------------

    pub async fn list_stages(&self, acting: &ActingUser) -> Result<Vec<PipelineStage>, AppError> {
        self.stages.list(acting.dealership_id).await
    }

    pub async fn create_stage(
        &self,
        acting: &ActingUser,
        request: CreateStageRequest,
    ) -> Result<ApiResponse<PipelineStage>, AppError> {
        request.validate()?;

        if self
            .stages
            .order_exists(acting.dealership_id, request.order_num, None)
            .await?
        {
            return Err(conflict_error(
                "Stage",
                "order_num",
                &request.order_num.to_string(),
            ));
        }

        let stage = self.stages.create(acting.dealership_id, request).await?;

        Ok(ApiResponse::success_with_message(
            stage,
            "Etapa creada exitosamente".to_string(),
        ))
    }

    pub async fn update_stage(
        &self,
        acting: &ActingUser,
        id: Uuid,
        request: UpdateStageRequest,
    ) -> Result<ApiResponse<PipelineStage>, AppError> {
        request.validate()?;

        if let Some(order_num) = request.order_num {
            if self
                .stages
                .order_exists(acting.dealership_id, order_num, Some(id))
                .await?
            {
                return Err(conflict_error("Stage", "order_num", &order_num.to_string()));
            }
        }

        let stage = self.stages.update(id, acting.dealership_id, request).await?;

        Ok(ApiResponse::success_with_message(
            stage,
            "Etapa actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete_stage(&self, acting: &ActingUser, id: Uuid) -> Result<(), AppError> {
        self.stages.delete(id, acting.dealership_id).await
    }

    // -----------------------------------------------------------------
    // Listas desplegables
    // -----------------------------------------------------------------

    pub async fn list_dropdowns(
        &self,
        acting: &ActingUser,
    ) -> Result<Vec<DropdownList>, AppError> {
        self.dropdowns.list(acting.dealership_id).await
    }

    pub async fn create_dropdown(
        &self,
        acting: &ActingUser,
        request: CreateDropdownRequest,
    ) -> Result<ApiResponse<DropdownList>, AppError> {
        request.validate()?;

        let values = normalize_values(request.values);
        if values.is_empty() {
            return Err(AppError::BadRequest(
                "La lista necesita al menos un valor".to_string(),
            ));
        }

        let list = self
            .dropdowns
            .create(acting.dealership_id, request.list_name, values)
            .await?;

        Ok(ApiResponse::success_with_message(
            list,
            "Lista creada exitosamente".to_string(),
        ))
    }

    pub async fn update_dropdown(
        &self,
        acting: &ActingUser,
        id: Uuid,
        request: UpdateDropdownRequest,
    ) -> Result<ApiResponse<DropdownList>, AppError> {
        request.validate()?;

        let values = match request.values {
            Some(values) => {
                let values = normalize_values(values);
                if values.is_empty() {
                    return Err(AppError::BadRequest(
                        "La lista necesita al menos un valor".to_string(),
                    ));
                }
                Some(values)
            }
            None => None,
        };

        let list = self
            .dropdowns
            .update(id, acting.dealership_id, request.list_name, values)
            .await?;

        Ok(ApiResponse::success_with_message(
            list,
            "Lista actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete_dropdown(&self, acting: &ActingUser, id: Uuid) -> Result<(), AppError> {
        self.dropdowns.delete(id, acting.dealership_id).await
    }

    // -----------------------------------------------------------------
    // Audit log
    // -----------------------------------------------------------------

    pub async fn recent_audit(
        &self,
        acting: &ActingUser,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, AppError> {
        self.audit
            .list_recent(acting.dealership_id, limit.clamp(1, 500))
            .await
    }
}

// Valores de dropdown: sin blancos ni entradas vacías
fn normalize_values(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
