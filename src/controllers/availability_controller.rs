//! Controller de disponibilidad
//!
//! Chequeo en vivo para los formularios: devuelve el resultado
//! estructurado del validador sin convertir la indisponibilidad en
//! error HTTP. El formulario decide qué bloquear y qué solo avisar.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::availability_dto::AvailabilityQuery;
use crate::services::availability_service::{AvailabilityService, ValidationResult};
use crate::services::resource_store::{PgResourceStore, ResourceStore};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_date_range;

pub struct AvailabilityController {
    store: Arc<dyn ResourceStore>,
    availability: AvailabilityService,
}

impl AvailabilityController {
    pub fn new(pool: PgPool) -> Self {
        let store: Arc<dyn ResourceStore> = Arc::new(PgResourceStore::new(pool));
        Self {
            availability: AvailabilityService::new(store.clone()),
            store,
        }
    }

    pub async fn check_vehicle(
        &self,
        id: Uuid,
        company_id: Uuid,
        query: AvailabilityQuery,
    ) -> AppResult<ValidationResult> {
        Self::validate_query(&query)?;
        let vehicle = self
            .store
            .get_vehicle(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este vehículo".to_string(),
            ));
        }

        self.availability
            .check_vehicle(&vehicle, query.start_date, query.end_date, query.exclude_trip_id)
            .await
    }

    pub async fn check_trailer(
        &self,
        id: Uuid,
        company_id: Uuid,
        query: AvailabilityQuery,
    ) -> AppResult<ValidationResult> {
        Self::validate_query(&query)?;
        let trailer = self
            .store
            .get_trailer(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Remolque no encontrado".to_string()))?;

        if trailer.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este remolque".to_string(),
            ));
        }

        self.availability
            .check_trailer(&trailer, query.start_date, query.end_date, query.exclude_trip_id)
            .await
    }

    pub async fn check_operator(
        &self,
        id: Uuid,
        company_id: Uuid,
        query: AvailabilityQuery,
    ) -> AppResult<ValidationResult> {
        Self::validate_query(&query)?;
        let operator = self
            .store
            .get_operator(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Operador no encontrado".to_string()))?;

        if operator.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este operador".to_string(),
            ));
        }

        self.availability
            .check_operator(&operator, query.start_date, query.end_date, query.exclude_trip_id)
            .await
    }

    fn validate_query(query: &AvailabilityQuery) -> AppResult<()> {
        if let Some(start) = query.start_date {
            validate_date_range(start, query.end_date)?;
        }
        Ok(())
    }
}
