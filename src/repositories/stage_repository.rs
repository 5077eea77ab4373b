use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::admin_dto::{CreateStageRequest, UpdateStageRequest};
use crate::models::stage::PipelineStage;
use crate::utils::errors::AppError;

const COLUMNS: &str = "id, dealership_id, order_num, stage_name, role, completion_field, completion_type, list_name, target_hours, stage_color, is_terminal, created_at";

pub struct StageRepository {
    pool: PgPool,
}

impl StageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Catálogo completo del concesionario en orden de pipeline
    pub async fn list(&self, dealership_id: Uuid) -> Result<Vec<PipelineStage>, AppError> {
        let stages = sqlx::query_as::<_, PipelineStage>(&format!(
            "SELECT {COLUMNS} FROM pipeline_stages WHERE dealership_id = $1 ORDER BY order_num ASC"
        ))
        .bind(dealership_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stages)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PipelineStage>, AppError> {
        let stage = sqlx::query_as::<_, PipelineStage>(&format!(
            "SELECT {COLUMNS} FROM pipeline_stages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stage)
    }

    /// `order_num` define el orden total del pipeline: debe ser único
    /// dentro del concesionario
    pub async fn order_exists(
        &self,
        dealership_id: Uuid,
        order_num: i32,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM pipeline_stages
                WHERE dealership_id = $1 AND order_num = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(dealership_id)
        .bind(order_num)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn create(
        &self,
        dealership_id: Uuid,
        request: CreateStageRequest,
    ) -> Result<PipelineStage, AppError> {
        let stage = sqlx::query_as::<_, PipelineStage>(&format!(
            r#"
            INSERT INTO pipeline_stages (id, dealership_id, order_num, stage_name, role, completion_field, completion_type, list_name, target_hours, stage_color, is_terminal, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(dealership_id)
        .bind(request.order_num)
        .bind(request.stage_name)
        .bind(request.role)
        .bind(request.completion_field)
        .bind(request.completion_type)
        .bind(request.list_name)
        .bind(request.target_hours)
        .bind(request.stage_color)
        .bind(request.is_terminal)
        .fetch_one(&self.pool)
        .await?;

        Ok(stage)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dealership_id: Uuid,
        request: UpdateStageRequest,
    ) -> Result<PipelineStage, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Etapa no encontrada".to_string()))?;

        if current.dealership_id != dealership_id {
            return Err(AppError::Forbidden(
                "La etapa no pertenece a este concesionario".to_string(),
            ));
        }

        let stage = sqlx::query_as::<_, PipelineStage>(&format!(
            r#"
            UPDATE pipeline_stages
            SET order_num = $2, stage_name = $3, role = $4, completion_field = $5, completion_type = $6, list_name = $7, target_hours = $8, stage_color = $9, is_terminal = $10
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.order_num.unwrap_or(current.order_num))
        .bind(request.stage_name.unwrap_or(current.stage_name))
        .bind(request.role.unwrap_or(current.role))
        .bind(request.completion_field.unwrap_or(current.completion_field))
        .bind(request.completion_type.unwrap_or(current.completion_type))
        .bind(request.list_name.or(current.list_name))
        .bind(request.target_hours.or(current.target_hours))
        .bind(request.stage_color.unwrap_or(current.stage_color))
        .bind(request.is_terminal.unwrap_or(current.is_terminal))
        .fetch_one(&self.pool)
        .await?;

        Ok(stage)
    }

    /// Borrado real: los completados asociados caen por cascade en la BD
    pub async fn delete(&self, id: Uuid, dealership_id: Uuid) -> Result<(), AppError> {
        let stage = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Etapa no encontrada".to_string()))?;

        if stage.dealership_id != dealership_id {
            return Err(AppError::Forbidden(
                "La etapa no pertenece a este concesionario".to_string(),
            ));
        }

        sqlx::query("DELETE FROM pipeline_stages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
