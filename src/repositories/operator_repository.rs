//! Repositorio de operadores
//!
//! Acceso a la tabla operators. El estado del operador (active/inactive/
//! suspended) es administrativo y se edita directo: no hay máquina de
//! estados porque su "ocupado" se deriva del solape con viajes activos.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::operator::Operator;
use crate::models::resource::OperatorStatus;
use crate::utils::errors::{AppError, AppResult};

pub struct OperatorRepository {
    pool: PgPool,
}

impl OperatorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        full_name: String,
        license_number: Option<String>,
    ) -> AppResult<Operator> {
        let operator = sqlx::query_as::<_, Operator>(
            r#"
            INSERT INTO operators (id, company_id, full_name, license_number, status, created_at)
            VALUES ($1, $2, $3, $4, 'active', $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(full_name)
        .bind(license_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(operator)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Operator>> {
        let operator = sqlx::query_as::<_, Operator>("SELECT * FROM operators WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(operator)
    }

    pub async fn find_by_company(&self, company_id: Uuid) -> AppResult<Vec<Operator>> {
        let operators = sqlx::query_as::<_, Operator>(
            "SELECT * FROM operators WHERE company_id = $1 ORDER BY full_name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(operators)
    }

    pub async fn list_active(
        &self,
        company_id: Uuid,
        exclude_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<Operator>> {
        let operators = sqlx::query_as::<_, Operator>(
            r#"
            SELECT * FROM operators
            WHERE company_id = $1 AND status = 'active' AND id <> $2
            ORDER BY full_name ASC
            LIMIT $3
            "#,
        )
        .bind(company_id)
        .bind(exclude_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(operators)
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        full_name: Option<String>,
        license_number: Option<String>,
    ) -> AppResult<Operator> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Operador no encontrado".to_string()))?;

        if current.company_id != company_id {
            return Err(AppError::Forbidden(
                "El operador no pertenece a esta empresa".to_string(),
            ));
        }

        let operator = sqlx::query_as::<_, Operator>(
            r#"
            UPDATE operators
            SET full_name = $2, license_number = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(full_name.unwrap_or(current.full_name))
        .bind(license_number.or(current.license_number))
        .fetch_one(&self.pool)
        .await?;

        Ok(operator)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        company_id: Uuid,
        status: OperatorStatus,
    ) -> AppResult<Operator> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Operador no encontrado".to_string()))?;

        if current.company_id != company_id {
            return Err(AppError::Forbidden(
                "El operador no pertenece a esta empresa".to_string(),
            ));
        }

        let operator = sqlx::query_as::<_, Operator>(
            "UPDATE operators SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(operator)
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> AppResult<()> {
        let operator = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Operador no encontrado".to_string()))?;

        if operator.company_id != company_id {
            return Err(AppError::Forbidden(
                "El operador no pertenece a esta empresa".to_string(),
            ));
        }

        sqlx::query("DELETE FROM operators WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
