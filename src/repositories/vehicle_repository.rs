//! Repositorio de vehículos
//!
//! Acceso a la tabla vehicles. El campo status NO se actualiza aquí:
//! una vez que existe un viaje, solo el motor de asignación (vía la
//! máquina de estados y su transacción) escribe ese campo.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resource::ResourceStatus;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        license_plate: String,
        brand: Option<String>,
        model: Option<String>,
        current_mileage: Decimal,
    ) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, company_id, license_plate, brand, model, status, current_mileage, created_at)
            VALUES ($1, $2, $3, $4, $5, 'available', $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(license_plate)
        .bind(brand)
        .bind(model)
        .bind(current_mileage)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_company(&self, company_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Vehículos en estado available de la misma empresa, excluyendo uno.
    /// Alimenta las sugerencias del validador de disponibilidad.
    pub async fn list_available(
        &self,
        company_id: Uuid,
        exclude_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE company_id = $1 AND status = 'available' AND id <> $2
            ORDER BY license_plate ASC
            LIMIT $3
            "#,
        )
        .bind(company_id)
        .bind(exclude_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn license_plate_exists(&self, license_plate: &str, company_id: Uuid) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE license_plate = $1 AND company_id = $2)",
        )
        .bind(license_plate)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        license_plate: Option<String>,
        brand: Option<String>,
        model: Option<String>,
        current_mileage: Option<Decimal>,
    ) -> AppResult<Vehicle> {
        // Obtener vehículo actual
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        // Verificar que pertenece a la empresa
        if current.company_id != company_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a esta empresa".to_string(),
            ));
        }

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET license_plate = $2, brand = $3, model = $4, current_mileage = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(license_plate.unwrap_or(current.license_plate))
        .bind(brand.or(current.brand))
        .bind(model.or(current.model))
        .bind(current_mileage.unwrap_or(current.current_mileage))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> AppResult<()> {
        let vehicle = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.company_id != company_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a esta empresa".to_string(),
            ));
        }

        // Un vehículo reservado por un viaje activo no se puede borrar
        if vehicle.status == ResourceStatus::InTrip {
            return Err(AppError::Conflict(
                "No se puede eliminar un vehículo asignado a un viaje activo".to_string(),
            ));
        }

        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
