//! Controller de remolques
//!
//! CRUD de remolques con la misma política de estado que los vehículos:
//! el campo status solo cambia a través de la máquina de estados.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::trailer_dto::{CreateTrailerRequest, TrailerResponse, UpdateTrailerRequest};
use crate::models::resource::{ResourceKind, ResourceStatus};
use crate::repositories::trailer_repository::TrailerRepository;
use crate::services::resource_store::{PgResourceStore, ResourceStore};
use crate::services::status_service::StatusService;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_license_plate;

pub struct TrailerController {
    repository: TrailerRepository,
    pool: PgPool,
}

impl TrailerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TrailerRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        request: CreateTrailerRequest,
    ) -> AppResult<ApiResponse<TrailerResponse>> {
        request.validate()?;
        let code = validate_license_plate(&request.code)?;

        if self.repository.code_exists(&code, company_id).await? {
            return Err(AppError::Conflict(
                "El código de remolque ya está registrado para esta empresa".to_string(),
            ));
        }

        let trailer = self
            .repository
            .create(company_id, code, request.trailer_type)
            .await?;

        Ok(ApiResponse::success_with_message(
            trailer.into(),
            "Remolque creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, company_id: Uuid) -> AppResult<TrailerResponse> {
        let trailer = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Remolque no encontrado".to_string()))?;

        if trailer.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este remolque".to_string(),
            ));
        }

        Ok(trailer.into())
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> AppResult<Vec<TrailerResponse>> {
        let trailers = self.repository.find_by_company(company_id).await?;
        Ok(trailers.into_iter().map(TrailerResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        request: UpdateTrailerRequest,
    ) -> AppResult<ApiResponse<TrailerResponse>> {
        request.validate()?;
        let code = match request.code {
            Some(code) => Some(validate_license_plate(&code)?),
            None => None,
        };

        let trailer = self
            .repository
            .update(id, company_id, code, request.trailer_type)
            .await?;

        Ok(ApiResponse::success_with_message(
            trailer.into(),
            "Remolque actualizado exitosamente".to_string(),
        ))
    }

    /// Cambio de estado vía la máquina de estados (misma política que
    /// los vehículos)
    pub async fn update_status(
        &self,
        id: Uuid,
        company_id: Uuid,
        requested: ResourceStatus,
    ) -> AppResult<ApiResponse<TrailerResponse>> {
        let trailer = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Remolque no encontrado".to_string()))?;

        if trailer.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este remolque".to_string(),
            ));
        }

        if requested == ResourceStatus::InTrip {
            return Err(AppError::Conflict(
                "El estado in_trip solo lo gestiona la asignación de viajes".to_string(),
            ));
        }
        if trailer.status == ResourceStatus::InTrip {
            return Err(AppError::Conflict(
                "El remolque está asignado a un viaje activo; libera el viaje primero".to_string(),
            ));
        }

        let store = PgResourceStore::new(self.pool.clone());
        let mut uow = store.begin().await?;
        let status_service = StatusService::new();

        let ok = match requested {
            ResourceStatus::Available => {
                status_service
                    .mark_available(uow.as_mut(), ResourceKind::Trailer, id, trailer.status)
                    .await?
            }
            ResourceStatus::Maintenance => {
                status_service
                    .mark_maintenance(uow.as_mut(), ResourceKind::Trailer, id, trailer.status)
                    .await?
            }
            ResourceStatus::OutOfService => {
                status_service
                    .mark_out_of_service(uow.as_mut(), ResourceKind::Trailer, id, trailer.status)
                    .await?
            }
            ResourceStatus::InTrip => unreachable!("rechazado arriba"),
        };

        if !ok {
            uow.rollback().await?;
            return Err(AppError::Conflict(format!(
                "Transición de estado no permitida: {} -> {}",
                trailer.status.as_str(),
                requested.as_str()
            )));
        }
        uow.commit().await?;

        let updated = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Remolque no encontrado".to_string()))?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Estado del remolque actualizado".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> AppResult<()> {
        self.repository.delete(id, company_id).await
    }
}
