//! Detector de solapes
//!
//! Consulta de solo lectura sobre el Resource Store: dados un recurso y
//! un intervalo de fechas, devuelve todos los viajes activos en conflicto.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::resource::ResourceKind;
use crate::models::trip::Trip;
use crate::services::resource_store::ResourceStore;
use crate::utils::errors::AppResult;

pub struct OverlapService {
    store: Arc<dyn ResourceStore>,
}

impl OverlapService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Viajes activos (planned/in_progress) del recurso cuyo intervalo
    /// intersecta [start, end], ordenados por fecha de inicio. Los viajes
    /// completed/cancelled nunca entran en conflicto. `exclude_trip_id`
    /// permite revalidar un viaje contra sí mismo sin auto-conflicto.
    pub async fn find_overlapping(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        start: NaiveDate,
        end: Option<NaiveDate>,
        exclude_trip_id: Option<Uuid>,
    ) -> AppResult<Vec<Trip>> {
        self.store
            .find_active_trips_overlapping(kind, resource_id, start, end, exclude_trip_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::resource_store::memory::*;

    #[tokio::test]
    async fn test_solo_viajes_activos_cuentan() {
        use crate::models::resource::{OperatorStatus, ResourceStatus};
        use crate::models::trip::TripStatus;

        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let vehicle = test_vehicle(company, "AB-123-CD", ResourceStatus::Available);
        let operator = test_operator(company, "Ana Pérez", OperatorStatus::Active);
        let vehicle_id = vehicle.id;

        let trip = test_trip(
            company,
            vehicle_id,
            None,
            operator.id,
            date(2024, 3, 1),
            Some(date(2024, 3, 10)),
        );
        let trip_id = trip.id;
        store.add_vehicle(vehicle);
        store.add_operator(operator);
        store.add_trip(trip);

        let service = OverlapService::new(Arc::new(store.clone()));

        let conflicts = service
            .find_overlapping(
                ResourceKind::Vehicle,
                vehicle_id,
                date(2024, 3, 5),
                Some(date(2024, 3, 7)),
                None,
            )
            .await
            .unwrap();
        assert_eq!(conflicts.len(), 1);

        // Un viaje completado deja de contar
        store.set_trip_status(trip_id, TripStatus::Completed);
        let conflicts = service
            .find_overlapping(
                ResourceKind::Vehicle,
                vehicle_id,
                date(2024, 3, 5),
                Some(date(2024, 3, 7)),
                None,
            )
            .await
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_excluir_el_propio_viaje() {
        use crate::models::resource::{OperatorStatus, ResourceStatus};

        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let vehicle = test_vehicle(company, "AB-123-CD", ResourceStatus::InTrip);
        let operator = test_operator(company, "Ana Pérez", OperatorStatus::Active);
        let vehicle_id = vehicle.id;

        let trip = test_trip(
            company,
            vehicle_id,
            None,
            operator.id,
            date(2024, 3, 1),
            Some(date(2024, 3, 10)),
        );
        let trip_id = trip.id;
        store.add_vehicle(vehicle);
        store.add_operator(operator);
        store.add_trip(trip);

        let service = OverlapService::new(Arc::new(store));

        // Sin exclusión: el propio viaje aparece como conflicto
        let conflicts = service
            .find_overlapping(
                ResourceKind::Vehicle,
                vehicle_id,
                date(2024, 3, 1),
                Some(date(2024, 3, 10)),
                None,
            )
            .await
            .unwrap();
        assert_eq!(conflicts.len(), 1);

        // Con exclusión: revalidar el viaje no se auto-conflicta
        let conflicts = service
            .find_overlapping(
                ResourceKind::Vehicle,
                vehicle_id,
                date(2024, 3, 1),
                Some(date(2024, 3, 10)),
                Some(trip_id),
            )
            .await
            .unwrap();
        assert!(conflicts.is_empty());
    }
}
