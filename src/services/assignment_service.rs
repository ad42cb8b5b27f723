//! Coordinador de asignación
//!
//! Punto de entrada único para reservar y liberar los recursos de un
//! viaje como una unidad: valida vehículo + remolque (opcional) +
//! operador sin cortocircuito, y solo si todo pasó muta los estados
//! dentro de una transacción. Si cualquier mutación falla, ninguna
//! sobrevive. La liberación es idempotente y de mejor esfuerzo.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::operator::Operator;
use crate::models::resource::{Assignable, ResourceKind, ResourceStatus};
use crate::models::trailer::Trailer;
use crate::models::trip::Trip;
use crate::models::vehicle::Vehicle;
use crate::services::availability_service::{AvailabilityService, ValidationResult};
use crate::services::resource_store::{ResourceStore, StoreTransaction};
use crate::services::status_service::StatusService;
use crate::utils::errors::{AppError, AppResult};

/// Resultado de una asignación
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResult {
    pub success: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AssignmentResult {
    fn from_validation(outcome: ValidationResult) -> Self {
        Self {
            success: outcome.is_valid,
            errors: outcome.errors,
            warnings: outcome.warnings,
            suggestions: outcome.suggestions,
        }
    }

    fn mutation_failed() -> Self {
        Self {
            success: false,
            errors: vec![
                "No se pudo actualizar el estado de los recursos; inténtalo de nuevo".to_string(),
            ],
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

/// Resultado de una liberación
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseResult {
    pub success: bool,
    pub errors: Vec<String>,
}

pub struct AssignmentService {
    store: Arc<dyn ResourceStore>,
    availability: AvailabilityService,
    status: StatusService,
}

impl AssignmentService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            availability: AvailabilityService::new(store.clone()),
            status: StatusService::new(),
            store,
        }
    }

    /// Reservar los recursos del viaje como una unidad.
    ///
    /// Los tres recursos se validan siempre, en orden fijo vehículo,
    /// remolque, operador, para que el resultado agregue todos los
    /// problemas de una pasada. Ningún estado se muta hasta que la
    /// validación completa pasó; un id inexistente es violación de
    /// contrato y sube como error duro, no como fallo de validación.
    pub async fn assign(&self, trip: &Trip, acting_user_id: Uuid) -> AppResult<AssignmentResult> {
        let vehicle = self
            .store
            .get_vehicle(trip.truck_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehículo {} no encontrado", trip.truck_id)))?;

        let trailer = match trip.trailer_id {
            Some(id) => Some(
                self.store
                    .get_trailer(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Remolque {} no encontrado", id)))?,
            ),
            None => None,
        };

        let operator = self
            .store
            .get_operator(trip.operator_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Operador {} no encontrado", trip.operator_id))
            })?;

        // Un recurso de otra empresa es violación de contrato, no un
        // fallo de validación
        for resource in [
            &vehicle as &dyn Assignable,
            &operator as &dyn Assignable,
        ]
        .into_iter()
        .chain(trailer.iter().map(|t| t as &dyn Assignable))
        {
            if resource.company_id() != trip.company_id {
                return Err(AppError::Forbidden(format!(
                    "El {} '{}' no pertenece a la empresa del viaje",
                    resource.kind().label(),
                    resource.display_name()
                )));
            }
        }

        let uow = self.store.begin().await?;

        let outcome = self.validate_all(trip, &vehicle, trailer.as_ref(), &operator).await?;
        if !outcome.is_valid {
            uow.rollback().await?;
            info!(
                "asignación rechazada para el viaje {} (usuario {}): {} errores",
                trip.id,
                acting_user_id,
                outcome.errors.len()
            );
            return Ok(AssignmentResult::from_validation(outcome));
        }

        let mut uow = uow;
        if !self.bind_resources(uow.as_mut(), &vehicle, trailer.as_ref()).await? {
            // Carrera: un recurso cambió de estado entre la validación y
            // la escritura guardada. Nada queda a medias.
            uow.rollback().await?;
            warn!(
                "estado obsoleto al asignar el viaje {} (usuario {}); rollback",
                trip.id, acting_user_id
            );
            return Ok(AssignmentResult::mutation_failed());
        }

        uow.commit().await?;
        info!(
            "recursos asignados al viaje {} (usuario {})",
            trip.id, acting_user_id
        );
        Ok(AssignmentResult::from_validation(outcome))
    }

    /// Liberar los recursos del viaje. Idempotente y de mejor esfuerzo:
    /// un recurso que ya no está en viaje se registra y se salta, porque
    /// una liberación puede reintentarse tras un fallo parcial anterior.
    pub async fn release(&self, trip: &Trip, acting_user_id: Uuid) -> AppResult<ReleaseResult> {
        let mut uow = self.store.begin().await?;

        match self.store.get_vehicle(trip.truck_id).await? {
            Some(vehicle) => {
                self.release_resource(uow.as_mut(), &vehicle).await?;
            }
            None => warn!(
                "el vehículo {} del viaje {} ya no existe; liberación omitida",
                trip.truck_id, trip.id
            ),
        }

        if let Some(trailer_id) = trip.trailer_id {
            match self.store.get_trailer(trailer_id).await? {
                Some(trailer) => {
                    self.release_resource(uow.as_mut(), &trailer).await?;
                }
                None => warn!(
                    "el remolque {} del viaje {} ya no existe; liberación omitida",
                    trailer_id, trip.id
                ),
            }
        }

        uow.commit().await?;
        info!(
            "recursos liberados del viaje {} (usuario {})",
            trip.id, acting_user_id
        );
        Ok(ReleaseResult {
            success: true,
            errors: Vec::new(),
        })
    }

    /// Validar los tres recursos sin cortocircuito, agregando todo
    async fn validate_all(
        &self,
        trip: &Trip,
        vehicle: &Vehicle,
        trailer: Option<&Trailer>,
        operator: &Operator,
    ) -> AppResult<ValidationResult> {
        // El propio viaje siempre se excluye del conjunto candidato para
        // que el flujo de edición no se auto-conflicte.
        let exclude = Some(trip.id);
        let start = Some(trip.start_date);

        let mut outcome = ValidationResult::valid();
        outcome.merge(
            self.availability
                .check_vehicle(vehicle, start, trip.end_date, exclude)
                .await?,
        );
        if let Some(trailer) = trailer {
            outcome.merge(
                self.availability
                    .check_trailer(trailer, start, trip.end_date, exclude)
                    .await?,
            );
        }
        outcome.merge(
            self.availability
                .check_operator(operator, start, trip.end_date, exclude)
                .await?,
        );

        Ok(outcome)
    }

    /// Marcar en viaje vehículo y remolque. Devuelve false al primer
    /// rechazo de la guarda; el llamador hace rollback de todo.
    async fn bind_resources(
        &self,
        uow: &mut dyn StoreTransaction,
        vehicle: &Vehicle,
        trailer: Option<&Trailer>,
    ) -> AppResult<bool> {
        let vehicle_ok = self
            .status
            .mark_in_trip(uow, ResourceKind::Vehicle, vehicle.id, vehicle.status)
            .await?;
        if !vehicle_ok {
            return Ok(false);
        }

        if let Some(trailer) = trailer {
            let trailer_ok = self
                .status
                .mark_in_trip(uow, ResourceKind::Trailer, trailer.id, trailer.status)
                .await?;
            if !trailer_ok {
                return Ok(false);
            }
        }

        // El operador no tiene campo de estado que mutar
        Ok(true)
    }

    async fn release_resource(
        &self,
        uow: &mut dyn StoreTransaction,
        resource: &dyn AssignableWithStatus,
    ) -> AppResult<()> {
        let (kind, id, status) = (resource.kind(), resource.resource_id(), resource.resource_status());

        if status != ResourceStatus::InTrip {
            // Ya liberado (reintento) o retenido por mantenimiento:
            // solo registro operativo, nunca fallo.
            log::debug!(
                "{} {} no estaba en viaje al liberar (estado: {})",
                kind.as_str(),
                id,
                status.as_str()
            );
            return Ok(());
        }

        let released = self.status.mark_available(uow, kind, id, status).await?;
        if !released {
            warn!(
                "el {} {} cambió de estado durante la liberación; se omite",
                kind.as_str(),
                id
            );
        }
        Ok(())
    }
}

/// Recurso con campo de estado de recurso (vehículo o remolque)
trait AssignableWithStatus: Assignable {
    fn resource_status(&self) -> ResourceStatus;
}

impl AssignableWithStatus for Vehicle {
    fn resource_status(&self) -> ResourceStatus {
        self.status
    }
}

impl AssignableWithStatus for Trailer {
    fn resource_status(&self) -> ResourceStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resource::OperatorStatus;
    use crate::models::trip::TripStatus;
    use crate::services::resource_store::memory::*;

    struct Fixture {
        store: MemoryStore,
        service: AssignmentService,
        company: Uuid,
        vehicle: Vehicle,
        trailer: Trailer,
        operator: Operator,
        user: Uuid,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let vehicle = test_vehicle(company, "AB-123-CD", ResourceStatus::Available);
        let trailer = test_trailer(company, "R-4501", ResourceStatus::Available);
        let operator = test_operator(company, "Ana Pérez", OperatorStatus::Active);
        store.add_vehicle(vehicle.clone());
        store.add_trailer(trailer.clone());
        store.add_operator(operator.clone());

        let service = AssignmentService::new(Arc::new(store.clone()));
        Fixture {
            store,
            service,
            company,
            vehicle,
            trailer,
            operator,
            user: Uuid::new_v4(),
        }
    }

    impl Fixture {
        fn trip(&self, start: (i32, u32, u32), end: Option<(i32, u32, u32)>) -> Trip {
            self.trip_with_trailer(None, start, end)
        }

        fn trip_with_trailer(
            &self,
            trailer_id: Option<Uuid>,
            start: (i32, u32, u32),
            end: Option<(i32, u32, u32)>,
        ) -> Trip {
            test_trip(
                self.company,
                self.vehicle.id,
                trailer_id,
                self.operator.id,
                date(start.0, start.1, start.2),
                end.map(|(y, m, d)| date(y, m, d)),
            )
        }
    }

    #[tokio::test]
    async fn test_asignacion_correcta_reserva_el_vehiculo() {
        let fx = fixture();
        let trip = fx.trip((2024, 3, 1), Some((2024, 3, 10)));
        fx.store.add_trip(trip.clone());

        let result = fx.service.assign(&trip, fx.user).await.unwrap();

        assert!(result.success);
        assert!(result.errors.is_empty());
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::InTrip);
    }

    #[tokio::test]
    async fn test_no_hay_doble_reserva_del_mismo_vehiculo() {
        let fx = fixture();
        let trip_a = fx.trip((2024, 3, 1), Some((2024, 3, 10)));
        fx.store.add_trip(trip_a.clone());
        assert!(fx.service.assign(&trip_a, fx.user).await.unwrap().success);

        // El viaje B solapa con A sobre el mismo vehículo
        let trip_b = fx.trip((2024, 3, 5), Some((2024, 3, 7)));
        fx.store.add_trip(trip_b.clone());
        let result = fx.service.assign(&trip_b, fx.user).await.unwrap();

        assert!(!result.success);
        // El error cita el intervalo del viaje en conflicto
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("2024-03-01 - 2024-03-10")));
    }

    #[tokio::test]
    async fn test_fechas_frontera_inclusivas_conflictan() {
        let fx = fixture();
        let trip_a = fx.trip((2024, 1, 1), Some((2024, 1, 5)));
        fx.store.add_trip(trip_a.clone());
        assert!(fx.service.assign(&trip_a, fx.user).await.unwrap().success);

        // B empieza el mismo día que termina A
        let trip_b = fx.trip((2024, 1, 5), Some((2024, 1, 10)));
        fx.store.add_trip(trip_b.clone());
        let result = fx.service.assign(&trip_b, fx.user).await.unwrap();

        assert!(!result.success);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("2024-01-01 - 2024-01-05")));
    }

    #[tokio::test]
    async fn test_todo_o_nada_con_remolque_invalido() {
        let fx = fixture();
        // El remolque está en mantenimiento; el vehículo pasaría
        let bad_trailer = test_trailer(fx.company, "R-9999", ResourceStatus::Maintenance);
        fx.store.add_trailer(bad_trailer.clone());

        let trip = fx.trip_with_trailer(Some(bad_trailer.id), (2024, 3, 1), Some((2024, 3, 10)));
        fx.store.add_trip(trip.clone());
        let result = fx.service.assign(&trip, fx.user).await.unwrap();

        assert!(!result.success);
        assert!(result.errors.iter().any(|e| e.contains("R-9999")));
        // El vehículo no quedó a medias: sigue available
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::Available);
    }

    #[tokio::test]
    async fn test_carrera_en_la_mutacion_hace_rollback_completo() {
        let fx = fixture();
        let trip = fx.trip_with_trailer(Some(fx.trailer.id), (2024, 3, 1), Some((2024, 3, 10)));
        fx.store.add_trip(trip.clone());

        // La validación pasa, pero la escritura del remolque llega
        // obsoleta (otra petición se interpuso)
        fx.store.fail_next_update_for(fx.trailer.id);
        let result = fx.service.assign(&trip, fx.user).await.unwrap();

        assert!(!result.success);
        assert!(result.errors.iter().any(|e| e.contains("No se pudo actualizar")));
        // El vehículo ya se había marcado y debe volver atrás
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::Available);
        assert_eq!(fx.store.trailer_status(fx.trailer.id), ResourceStatus::Available);
    }

    #[tokio::test]
    async fn test_liberacion_idempotente() {
        let fx = fixture();
        let trip = fx.trip((2024, 3, 1), Some((2024, 3, 10)));
        fx.store.add_trip(trip.clone());
        assert!(fx.service.assign(&trip, fx.user).await.unwrap().success);
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::InTrip);

        // Liberar dos veces seguidas nunca falla
        let first = fx.service.release(&trip, fx.user).await.unwrap();
        let second = fx.service.release(&trip, fx.user).await.unwrap();

        assert!(first.success && second.success);
        assert!(first.errors.is_empty() && second.errors.is_empty());
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::Available);
    }

    #[tokio::test]
    async fn test_operador_inactivo_bloquea_la_asignacion() {
        let fx = fixture();
        let inactive = test_operator(fx.company, "Luis Gómez", OperatorStatus::Inactive);
        fx.store.add_operator(inactive.clone());

        let mut trip = fx.trip((2024, 3, 1), Some((2024, 3, 10)));
        trip.operator_id = inactive.id;
        fx.store.add_trip(trip.clone());
        let result = fx.service.assign(&trip, fx.user).await.unwrap();

        assert!(!result.success);
        assert!(result.errors.iter().any(|e| e.contains("inactive")));
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::Available);
    }

    #[tokio::test]
    async fn test_recurso_inexistente_es_error_duro() {
        let fx = fixture();
        let mut trip = fx.trip((2024, 3, 1), Some((2024, 3, 10)));
        trip.truck_id = Uuid::new_v4();

        let err = fx.service.assign(&trip, fx.user).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_viaje_abierto_conflicta_hacia_adelante() {
        let fx = fixture();
        // Viaje A sin fecha de fin: retiene el vehículo indefinidamente
        let trip_a = fx.trip((2024, 3, 1), None);
        fx.store.add_trip(trip_a.clone());
        assert!(fx.service.assign(&trip_a, fx.user).await.unwrap().success);

        let trip_b = fx.trip((2025, 6, 1), Some((2025, 6, 10)));
        fx.store.add_trip(trip_b.clone());
        let result = fx.service.assign(&trip_b, fx.user).await.unwrap();

        assert!(!result.success);
        assert!(result.errors.iter().any(|e| e.contains("sin fecha de fin")));
    }

    #[tokio::test]
    async fn test_escenario_completo_asignar_liberar_reasignar() {
        let fx = fixture();

        // Trip A reserva el vehículo
        let trip_a = fx.trip((2024, 3, 1), Some((2024, 3, 10)));
        fx.store.add_trip(trip_a.clone());
        assert!(fx.service.assign(&trip_a, fx.user).await.unwrap().success);
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::InTrip);

        // Trip B solapado falla citando el intervalo de A
        let trip_b = fx.trip((2024, 3, 5), Some((2024, 3, 7)));
        fx.store.add_trip(trip_b.clone());
        let rejected = fx.service.assign(&trip_b, fx.user).await.unwrap();
        assert!(!rejected.success);
        assert!(rejected
            .errors
            .iter()
            .any(|e| e.contains("2024-03-01 - 2024-03-10")));

        // A termina y se libera; B ahora entra
        fx.store.set_trip_status(trip_a.id, TripStatus::Completed);
        assert!(fx.service.release(&trip_a, fx.user).await.unwrap().success);
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::Available);

        let accepted = fx.service.assign(&trip_b, fx.user).await.unwrap();
        assert!(accepted.success);
        assert_eq!(fx.store.vehicle_status(fx.vehicle.id), ResourceStatus::InTrip);
    }
}
