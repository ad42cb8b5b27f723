//! Controller de viajes
//!
//! Ciclo de vida del viaje y su encaje con el motor de asignación:
//! crear valida-y-reserva, completar y cancelar liberan, y la edición
//! (solo viajes planificados) libera, actualiza y vuelve a reservar.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::trip_dto::{AssignTripResponse, CreateTripRequest, TripResponse, UpdateTripRequest};
use crate::models::trip::{Trip, TripStatus};
use crate::repositories::trip_repository::TripRepository;
use crate::services::assignment_service::AssignmentService;
use crate::services::resource_store::{PgResourceStore, ResourceStore};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_date_range;

pub struct TripController {
    trips: TripRepository,
    assignment: AssignmentService,
}

impl TripController {
    pub fn new(pool: PgPool) -> Self {
        let store: Arc<dyn ResourceStore> = Arc::new(PgResourceStore::new(pool.clone()));
        Self {
            trips: TripRepository::new(pool),
            assignment: AssignmentService::new(store),
        }
    }

    /// Crear un viaje y reservar sus recursos. Si la asignación falla,
    /// el viaje no queda guardado: el formulario recibe los errores y
    /// sugerencias para corregir.
    pub async fn create(
        &self,
        company_id: Uuid,
        acting_user_id: Uuid,
        request: CreateTripRequest,
    ) -> AppResult<AssignTripResponse> {
        request.validate()?;
        validate_date_range(request.start_date, request.end_date)?;

        let trip = Trip {
            id: Uuid::new_v4(),
            company_id,
            truck_id: request.truck_id,
            trailer_id: request.trailer_id,
            operator_id: request.operator_id,
            origin: request.origin,
            destination: request.destination,
            start_date: request.start_date,
            end_date: request.end_date,
            status: TripStatus::Planned,
            created_by: acting_user_id,
            created_at: Utc::now(),
        };

        let trip = self.trips.create(&trip).await?;
        let result = self.assignment.assign(&trip, acting_user_id).await?;

        if !result.success {
            self.trips.delete_row(trip.id).await?;
            return Ok(AssignTripResponse::rejected(result));
        }

        Ok(AssignTripResponse::assigned(trip, result))
    }

    pub async fn get_by_id(&self, id: Uuid, company_id: Uuid) -> AppResult<TripResponse> {
        let trip = self.find_owned(id, company_id).await?;
        Ok(trip.into())
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> AppResult<Vec<TripResponse>> {
        let trips = self.trips.find_by_company(company_id).await?;
        Ok(trips.into_iter().map(TripResponse::from).collect())
    }

    /// Reasignar un viaje planificado (flujo de edición): liberar las
    /// reservas actuales, actualizar la fila y volver a reservar. Si la
    /// nueva asignación falla, el viaje queda planificado y sin
    /// recursos, con los errores a la vista; nada queda a medias.
    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        acting_user_id: Uuid,
        request: UpdateTripRequest,
    ) -> AppResult<AssignTripResponse> {
        request.validate()?;
        let current = self.find_owned(id, company_id).await?;

        if current.status != TripStatus::Planned {
            return Err(AppError::Conflict(
                "Solo se puede editar un viaje planificado".to_string(),
            ));
        }

        let mut updated = current.clone();
        if let Some(truck_id) = request.truck_id {
            updated.truck_id = truck_id;
        }
        if let Some(trailer_id) = request.trailer_id {
            updated.trailer_id = trailer_id;
        }
        if let Some(operator_id) = request.operator_id {
            updated.operator_id = operator_id;
        }
        if let Some(origin) = request.origin {
            updated.origin = origin;
        }
        if let Some(destination) = request.destination {
            updated.destination = destination;
        }
        if let Some(start_date) = request.start_date {
            updated.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            updated.end_date = end_date;
        }
        validate_date_range(updated.start_date, updated.end_date)?;

        // Liberar las reservas del estado anterior antes de revalidar
        self.assignment.release(&current, acting_user_id).await?;

        let updated = self.trips.update(&updated).await?;
        let result = self.assignment.assign(&updated, acting_user_id).await?;

        if !result.success {
            return Ok(AssignTripResponse::rejected(result));
        }
        Ok(AssignTripResponse::assigned(updated, result))
    }

    /// planned -> in_progress; los recursos ya estaban reservados
    pub async fn start(&self, id: Uuid, company_id: Uuid) -> AppResult<ApiResponse<TripResponse>> {
        let trip = self.find_owned(id, company_id).await?;

        if trip.status != TripStatus::Planned {
            return Err(AppError::Conflict(format!(
                "Solo un viaje planificado puede iniciarse (estado actual: {})",
                trip.status.as_str()
            )));
        }

        let trip = self.trips.update_status(id, TripStatus::InProgress).await?;
        Ok(ApiResponse::success_with_message(
            trip.into(),
            "Viaje iniciado".to_string(),
        ))
    }

    /// Completar el viaje y liberar sus recursos. Repetir la llamada
    /// sobre un viaje ya completado solo reintenta la liberación (que es
    /// idempotente), para poder recuperarse de un fallo parcial anterior.
    pub async fn complete(
        &self,
        id: Uuid,
        company_id: Uuid,
        acting_user_id: Uuid,
    ) -> AppResult<ApiResponse<TripResponse>> {
        let trip = self.find_owned(id, company_id).await?;

        let trip = match trip.status {
            TripStatus::Planned | TripStatus::InProgress => {
                self.trips.update_status(id, TripStatus::Completed).await?
            }
            // Reintento: el estado ya está puesto, solo falta liberar
            TripStatus::Completed => trip,
            TripStatus::Cancelled => {
                return Err(AppError::Conflict(
                    "El viaje está cancelado; no se puede completar".to_string(),
                ))
            }
        };
        self.assignment.release(&trip, acting_user_id).await?;

        Ok(ApiResponse::success_with_message(
            trip.into(),
            "Viaje completado y recursos liberados".to_string(),
        ))
    }

    /// Cancelar el viaje; también libera lo que ya estuviera reservado.
    /// Igual que completar, repetir la cancelación solo reintenta la
    /// liberación.
    pub async fn cancel(
        &self,
        id: Uuid,
        company_id: Uuid,
        acting_user_id: Uuid,
    ) -> AppResult<ApiResponse<TripResponse>> {
        let trip = self.find_owned(id, company_id).await?;

        let trip = match trip.status {
            TripStatus::Planned | TripStatus::InProgress => {
                self.trips.update_status(id, TripStatus::Cancelled).await?
            }
            TripStatus::Cancelled => trip,
            TripStatus::Completed => {
                return Err(AppError::Conflict(
                    "El viaje está completado; no se puede cancelar".to_string(),
                ))
            }
        };
        self.assignment.release(&trip, acting_user_id).await?;

        Ok(ApiResponse::success_with_message(
            trip.into(),
            "Viaje cancelado y recursos liberados".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid, acting_user_id: Uuid) -> AppResult<()> {
        let trip = self.find_owned(id, company_id).await?;

        match trip.status {
            TripStatus::InProgress => Err(AppError::Conflict(
                "No se puede eliminar un viaje en curso; cancélalo primero".to_string(),
            )),
            TripStatus::Planned => {
                // Liberar las reservas antes de borrar la fila
                self.assignment.release(&trip, acting_user_id).await?;
                self.trips.delete_row(trip.id).await
            }
            TripStatus::Completed | TripStatus::Cancelled => self.trips.delete_row(trip.id).await,
        }
    }

    async fn find_owned(&self, id: Uuid, company_id: Uuid) -> AppResult<Trip> {
        let trip = self
            .trips
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Viaje no encontrado".to_string()))?;

        if trip.company_id != company_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este viaje".to_string(),
            ));
        }
        Ok(trip)
    }
}
