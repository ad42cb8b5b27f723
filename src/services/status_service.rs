//! Máquina de estados de recursos
//!
//! Aplica la tabla de transiciones de vehículos y remolques y ejecuta la
//! mutación real a través de la unidad de trabajo. Toda transición está
//! guardada, nunca forzada: una transición denegada devuelve `false` y el
//! llamador la trata como fallo de validación recuperable, no como error
//! fatal. Los operadores no tienen máquina de estados.

use tracing::debug;
use uuid::Uuid;

use crate::models::resource::{ResourceKind, ResourceStatus};
use crate::services::resource_store::StoreTransaction;
use crate::utils::errors::AppResult;

#[derive(Default)]
pub struct StatusService;

impl StatusService {
    pub fn new() -> Self {
        Self
    }

    /// Reservar el recurso para un viaje. Solo procede desde `available`.
    pub async fn mark_in_trip(
        &self,
        uow: &mut dyn StoreTransaction,
        kind: ResourceKind,
        id: Uuid,
        observed: ResourceStatus,
    ) -> AppResult<bool> {
        self.transition(uow, kind, id, observed, ResourceStatus::InTrip).await
    }

    /// Liberar el recurso al terminar o cancelar el viaje
    pub async fn mark_available(
        &self,
        uow: &mut dyn StoreTransaction,
        kind: ResourceKind,
        id: Uuid,
        observed: ResourceStatus,
    ) -> AppResult<bool> {
        self.transition(uow, kind, id, observed, ResourceStatus::Available).await
    }

    /// Enviar a mantenimiento. Denegado mientras está en viaje.
    pub async fn mark_maintenance(
        &self,
        uow: &mut dyn StoreTransaction,
        kind: ResourceKind,
        id: Uuid,
        observed: ResourceStatus,
    ) -> AppResult<bool> {
        self.transition(uow, kind, id, observed, ResourceStatus::Maintenance).await
    }

    /// Dar de baja. Denegado mientras está en viaje (hay que liberar antes).
    pub async fn mark_out_of_service(
        &self,
        uow: &mut dyn StoreTransaction,
        kind: ResourceKind,
        id: Uuid,
        observed: ResourceStatus,
    ) -> AppResult<bool> {
        self.transition(uow, kind, id, observed, ResourceStatus::OutOfService).await
    }

    async fn transition(
        &self,
        uow: &mut dyn StoreTransaction,
        kind: ResourceKind,
        id: Uuid,
        from: ResourceStatus,
        to: ResourceStatus,
    ) -> AppResult<bool> {
        if !from.can_transition(to) {
            debug!(
                "transición denegada para {} {}: {} -> {}",
                kind.as_str(),
                id,
                from.as_str(),
                to.as_str()
            );
            return Ok(false);
        }

        // La escritura lleva guarda optimista sobre el estado observado:
        // si otra petición se interpuso, no se escribe ninguna fila.
        uow.update_resource_status(kind, id, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resource::ResourceStatus::*;

    #[test]
    fn test_tabla_desde_available() {
        assert!(Available.can_transition(InTrip));
        assert!(Available.can_transition(Maintenance));
        assert!(Available.can_transition(OutOfService));
    }

    #[test]
    fn test_tabla_desde_in_trip() {
        // Desde in_trip solo se puede liberar
        assert!(InTrip.can_transition(Available));
        assert!(!InTrip.can_transition(Maintenance));
        assert!(!InTrip.can_transition(OutOfService));
    }

    #[test]
    fn test_tabla_desde_maintenance() {
        assert!(Maintenance.can_transition(Available));
        assert!(Maintenance.can_transition(OutOfService));
        // Nunca directo a viaje
        assert!(!Maintenance.can_transition(InTrip));
    }

    #[test]
    fn test_tabla_desde_out_of_service() {
        // Solo vuelve pasando por maintenance
        assert!(OutOfService.can_transition(Maintenance));
        assert!(!OutOfService.can_transition(Available));
        assert!(!OutOfService.can_transition(InTrip));
    }

    #[test]
    fn test_sin_auto_transiciones() {
        for status in [Available, InTrip, Maintenance, OutOfService] {
            assert!(!status.can_transition(status));
        }
    }

    mod con_store {
        use super::*;
        use crate::models::resource::ResourceKind;
        use crate::services::resource_store::memory::*;
        use crate::services::resource_store::ResourceStore;

        #[tokio::test]
        async fn test_transicion_denegada_no_toca_el_store() {
            let store = MemoryStore::new();
            let company = uuid::Uuid::new_v4();
            let vehicle = test_vehicle(company, "AB-123-CD", InTrip);
            let vehicle_id = vehicle.id;
            store.add_vehicle(vehicle);

            let mut uow = store.begin().await.unwrap();
            let ok = StatusService::new()
                .mark_maintenance(uow.as_mut(), ResourceKind::Vehicle, vehicle_id, InTrip)
                .await
                .unwrap();
            uow.rollback().await.unwrap();

            assert!(!ok);
            assert_eq!(store.vehicle_status(vehicle_id), InTrip);
        }

        #[tokio::test]
        async fn test_guarda_optimista_detecta_estado_obsoleto() {
            let store = MemoryStore::new();
            let company = uuid::Uuid::new_v4();
            let vehicle = test_vehicle(company, "AB-123-CD", Maintenance);
            let vehicle_id = vehicle.id;
            store.add_vehicle(vehicle);

            // La validación observó available, pero el recurso ya cambió
            let mut uow = store.begin().await.unwrap();
            let ok = StatusService::new()
                .mark_in_trip(uow.as_mut(), ResourceKind::Vehicle, vehicle_id, Available)
                .await
                .unwrap();
            uow.rollback().await.unwrap();

            assert!(!ok);
            assert_eq!(store.vehicle_status(vehicle_id), Maintenance);
        }

        #[tokio::test]
        async fn test_transicion_permitida_escribe() {
            let store = MemoryStore::new();
            let company = uuid::Uuid::new_v4();
            let vehicle = test_vehicle(company, "AB-123-CD", Available);
            let vehicle_id = vehicle.id;
            store.add_vehicle(vehicle);

            let mut uow = store.begin().await.unwrap();
            let ok = StatusService::new()
                .mark_in_trip(uow.as_mut(), ResourceKind::Vehicle, vehicle_id, Available)
                .await
                .unwrap();
            uow.commit().await.unwrap();

            assert!(ok);
            assert_eq!(store.vehicle_status(vehicle_id), InTrip);
        }
    }
}
