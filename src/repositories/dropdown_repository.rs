use sqlx::PgPool;
use uuid::Uuid;

use crate::models::dropdown::DropdownList;
use crate::utils::errors::AppError;

const COLUMNS: &str = r#"id, dealership_id, list_name, "values", created_at"#;

pub struct DropdownRepository {
    pool: PgPool,
}

impl DropdownRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, dealership_id: Uuid) -> Result<Vec<DropdownList>, AppError> {
        let lists = sqlx::query_as::<_, DropdownList>(&format!(
            "SELECT {COLUMNS} FROM dropdown_lists WHERE dealership_id = $1 ORDER BY list_name ASC"
        ))
        .bind(dealership_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lists)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DropdownList>, AppError> {
        let list = sqlx::query_as::<_, DropdownList>(&format!(
            "SELECT {COLUMNS} FROM dropdown_lists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(list)
    }

    pub async fn create(
        &self,
        dealership_id: Uuid,
        list_name: String,
        values: Vec<String>,
    ) -> Result<DropdownList, AppError> {
        let list = sqlx::query_as::<_, DropdownList>(&format!(
            r#"
            INSERT INTO dropdown_lists (id, dealership_id, list_name, "values", created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(dealership_id)
        .bind(list_name)
        .bind(values)
        .fetch_one(&self.pool)
        .await?;

        Ok(list)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dealership_id: Uuid,
        list_name: Option<String>,
        values: Option<Vec<String>>,
    ) -> Result<DropdownList, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lista no encontrada".to_string()))?;

        if current.dealership_id != dealership_id {
            return Err(AppError::Forbidden(
                "La lista no pertenece a este concesionario".to_string(),
            ));
        }

        let list = sqlx::query_as::<_, DropdownList>(&format!(
            r#"
            UPDATE dropdown_lists SET list_name = $2, "values" = $3
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(list_name.unwrap_or(current.list_name))
        .bind(values.unwrap_or(current.values))
        .fetch_one(&self.pool)
        .await?;

        Ok(list)
    }

    pub async fn delete(&self, id: Uuid, dealership_id: Uuid) -> Result<(), AppError> {
        let list = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lista no encontrada".to_string()))?;

        if list.dealership_id != dealership_id {
            return Err(AppError::Forbidden(
                "La lista no pertenece a este concesionario".to_string(),
            ));
        }

        sqlx::query("DELETE FROM dropdown_lists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
