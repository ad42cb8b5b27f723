//! Controller de vehículos
//!
//! CRUD de vehículos. El campo de estado no se edita directo: todo
//! cambio pasa por la máquina de estados, así un vehículo en viaje no
//! puede desincronizarse desde un formulario.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::resource::{ResourceKind, ResourceStatus};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::resource_store::{PgResourceStore, ResourceStore};
use crate::services::status_service::StatusService;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_license_plate;

pub struct VehicleController {
    repository: VehicleRepository,
    pool: PgPool,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        request: CreateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        request.validate()?;
        let plate = validate_license_plate(&request.license_plate)?;

        // Verificar que la matrícula no exista para esta empresa
        if self.repository.license_plate_exists(&plate, company_id).await? {
            return Err(AppError::Conflict(
                "La matrícula ya está registrada para esta empresa".to_string(),
            ));
        }

        let vehicle = self
            .repository
            .create(
                company_id,
                plate,
                request.brand,
                request.model,
                request.current_mileage.unwrap_or_default(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, company_id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este vehículo".to_string(),
            ));
        }

        Ok(vehicle.into())
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.find_by_company(company_id).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        request.validate()?;
        let plate = match request.license_plate {
            Some(plate) => Some(validate_license_plate(&plate)?),
            None => None,
        };

        let vehicle = self
            .repository
            .update(
                id,
                company_id,
                plate,
                request.brand,
                request.model,
                request.current_mileage,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    /// Cambio de estado vía la máquina de estados. Un vehículo en viaje
    /// rechaza cualquier edición directa; `in_trip` solo lo escribe el
    /// motor de asignación.
    pub async fn update_status(
        &self,
        id: Uuid,
        company_id: Uuid,
        requested: ResourceStatus,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este vehículo".to_string(),
            ));
        }

        if requested == ResourceStatus::InTrip {
            return Err(AppError::Conflict(
                "El estado in_trip solo lo gestiona la asignación de viajes".to_string(),
            ));
        }
        if vehicle.status == ResourceStatus::InTrip {
            return Err(AppError::Conflict(
                "El vehículo está asignado a un viaje activo; libera el viaje primero".to_string(),
            ));
        }

        let store = PgResourceStore::new(self.pool.clone());
        let mut uow = store.begin().await?;
        let status_service = StatusService::new();

        let ok = match requested {
            ResourceStatus::Available => {
                status_service
                    .mark_available(uow.as_mut(), ResourceKind::Vehicle, id, vehicle.status)
                    .await?
            }
            ResourceStatus::Maintenance => {
                status_service
                    .mark_maintenance(uow.as_mut(), ResourceKind::Vehicle, id, vehicle.status)
                    .await?
            }
            ResourceStatus::OutOfService => {
                status_service
                    .mark_out_of_service(uow.as_mut(), ResourceKind::Vehicle, id, vehicle.status)
                    .await?
            }
            ResourceStatus::InTrip => unreachable!("rechazado arriba"),
        };

        if !ok {
            uow.rollback().await?;
            return Err(AppError::Conflict(format!(
                "Transición de estado no permitida: {} -> {}",
                vehicle.status.as_str(),
                requested.as_str()
            )));
        }
        uow.commit().await?;

        let updated = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Estado del vehículo actualizado".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> AppResult<()> {
        self.repository.delete(id, company_id).await
    }
}
