//! Repositorio de remolques
//!
//! Acceso a la tabla trailers. Igual que con los vehículos, el campo
//! status solo lo escribe el motor de asignación.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resource::ResourceStatus;
use crate::models::trailer::Trailer;
use crate::utils::errors::{AppError, AppResult};

pub struct TrailerRepository {
    pool: PgPool,
}

impl TrailerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        code: String,
        trailer_type: Option<String>,
    ) -> AppResult<Trailer> {
        let trailer = sqlx::query_as::<_, Trailer>(
            r#"
            INSERT INTO trailers (id, company_id, code, trailer_type, status, created_at)
            VALUES ($1, $2, $3, $4, 'available', $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(code)
        .bind(trailer_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(trailer)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trailer>> {
        let trailer = sqlx::query_as::<_, Trailer>("SELECT * FROM trailers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trailer)
    }

    pub async fn find_by_company(&self, company_id: Uuid) -> AppResult<Vec<Trailer>> {
        let trailers = sqlx::query_as::<_, Trailer>(
            "SELECT * FROM trailers WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trailers)
    }

    pub async fn list_available(
        &self,
        company_id: Uuid,
        exclude_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<Trailer>> {
        let trailers = sqlx::query_as::<_, Trailer>(
            r#"
            SELECT * FROM trailers
            WHERE company_id = $1 AND status = 'available' AND id <> $2
            ORDER BY code ASC
            LIMIT $3
            "#,
        )
        .bind(company_id)
        .bind(exclude_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(trailers)
    }

    pub async fn code_exists(&self, code: &str, company_id: Uuid) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM trailers WHERE code = $1 AND company_id = $2)",
        )
        .bind(code)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        code: Option<String>,
        trailer_type: Option<String>,
    ) -> AppResult<Trailer> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Remolque no encontrado".to_string()))?;

        if current.company_id != company_id {
            return Err(AppError::Forbidden(
                "El remolque no pertenece a esta empresa".to_string(),
            ));
        }

        let trailer = sqlx::query_as::<_, Trailer>(
            r#"
            UPDATE trailers
            SET code = $2, trailer_type = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(code.unwrap_or(current.code))
        .bind(trailer_type.or(current.trailer_type))
        .fetch_one(&self.pool)
        .await?;

        Ok(trailer)
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> AppResult<()> {
        let trailer = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Remolque no encontrado".to_string()))?;

        if trailer.company_id != company_id {
            return Err(AppError::Forbidden(
                "El remolque no pertenece a esta empresa".to_string(),
            ));
        }

        if trailer.status == ResourceStatus::InTrip {
            return Err(AppError::Conflict(
                "No se puede eliminar un remolque asignado a un viaje activo".to_string(),
            ));
        }

        sqlx::query("DELETE FROM trailers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
