use sqlx::PgPool;
use uuid::Uuid;

use crate::models::completion::StageCompletion;
use crate::services::pipeline_engine::CompletionTransition;
use crate::utils::errors::AppError;

const COLUMNS: &str = "id, vehicle_id, stage_id, completion_value, completed_by, completed_at, cleared_at";

pub struct CompletionRepository {
    pool: PgPool,
}

impl CompletionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// La fila viva de un par (vehicle, stage); como mucho hay una
    pub async fn find(
        &self,
        vehicle_id: Uuid,
        stage_id: Uuid,
    ) -> Result<Option<StageCompletion>, AppError> {
        let completion = sqlx::query_as::<_, StageCompletion>(&format!(
            "SELECT {COLUMNS} FROM stage_completions WHERE vehicle_id = $1 AND stage_id = $2 LIMIT 1"
        ))
        .bind(vehicle_id)
        .bind(stage_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(completion)
    }

    pub async fn list_for_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<StageCompletion>, AppError> {
        let completions = sqlx::query_as::<_, StageCompletion>(&format!(
            "SELECT {COLUMNS} FROM stage_completions WHERE vehicle_id = $1"
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(completions)
    }

    /// Todos los completados de los vehículos de un concesionario,
    /// para derivar estados de la flota en una sola pasada
    pub async fn list_for_dealership(
        &self,
        dealership_id: Uuid,
    ) -> Result<Vec<StageCompletion>, AppError> {
        let completions = sqlx::query_as::<_, StageCompletion>(
            r#"
            SELECT sc.id, sc.vehicle_id, sc.stage_id, sc.completion_value, sc.completed_by, sc.completed_at, sc.cleared_at
            FROM stage_completions sc
            JOIN vehicles v ON v.id = sc.vehicle_id
            WHERE v.dealership_id = $1
            "#,
        )
        .bind(dealership_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(completions)
    }

    /// Persistir una transición planificada por el motor de pipeline.
    ///
    /// Complete crea la fila si falta o la sobreescribe (y anula
    /// cleared_at). Clear conserva la fila: anula valor y autor y
    /// estampa cleared_at. Noop no toca nada.
    pub async fn persist_transition(
        &self,
        vehicle_id: Uuid,
        stage_id: Uuid,
        existing: Option<&StageCompletion>,
        transition: &CompletionTransition,
    ) -> Result<Option<StageCompletion>, AppError> {
        match transition {
            CompletionTransition::Complete {
                value,
                completed_by,
                completed_at,
            } => {
                let row = if let Some(current) = existing {
                    sqlx::query_as::<_, StageCompletion>(&format!(
                        r#"
                        UPDATE stage_completions
                        SET completion_value = $2, completed_by = $3, completed_at = $4, cleared_at = NULL
                        WHERE id = $1
                        RETURNING {COLUMNS}
                        "#
                    ))
                    .bind(current.id)
                    .bind(value)
                    .bind(completed_by)
                    .bind(completed_at)
                    .fetch_one(&self.pool)
                    .await?
                } else {
                    sqlx::query_as::<_, StageCompletion>(&format!(
                        r#"
                        INSERT INTO stage_completions (id, vehicle_id, stage_id, completion_value, completed_by, completed_at, cleared_at)
                        VALUES ($1, $2, $3, $4, $5, $6, NULL)
                        RETURNING {COLUMNS}
                        "#
                    ))
                    .bind(Uuid::new_v4())
                    .bind(vehicle_id)
                    .bind(stage_id)
                    .bind(value)
                    .bind(completed_by)
                    .bind(completed_at)
                    .fetch_one(&self.pool)
                    .await?
                };

                Ok(Some(row))
            }

            CompletionTransition::Clear { cleared_at } => match existing {
                Some(current) => {
                    let row = sqlx::query_as::<_, StageCompletion>(&format!(
                        r#"
                        UPDATE stage_completions
                        SET completion_value = NULL, completed_by = NULL, completed_at = NULL, cleared_at = $2
                        WHERE id = $1
                        RETURNING {COLUMNS}
                        "#
                    ))
                    .bind(current.id)
                    .bind(cleared_at)
                    .fetch_one(&self.pool)
                    .await?;

                    Ok(Some(row))
                }
                None => Ok(None),
            },

            CompletionTransition::Noop => Ok(None),
        }
    }
}
