//! Resource Store del motor de asignación
//!
//! Este módulo define la frontera entre el motor y el almacenamiento:
//! lecturas de recursos y viajes por un lado, y una unidad de trabajo
//! (begin/commit/rollback + escritura de estado con guarda) por el otro.
//! El coordinador de asignación nunca ve SQL; solo estos dos traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::operator::Operator;
use crate::models::resource::{ResourceKind, ResourceStatus};
use crate::models::trailer::Trailer;
use crate::models::trip::Trip;
use crate::models::vehicle::Vehicle;
use crate::repositories::operator_repository::OperatorRepository;
use crate::repositories::trailer_repository::TrailerRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};

/// Lecturas que el motor necesita del almacenamiento
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn get_trailer(&self, id: Uuid) -> AppResult<Option<Trailer>>;
    async fn get_operator(&self, id: Uuid) -> AppResult<Option<Operator>>;

    /// Viajes activos del recurso cuyo intervalo intersecta el pedido,
    /// ordenados por fecha de inicio. `exclude_trip_id` saca al propio
    /// viaje del conjunto candidato (flujo de edición).
    async fn find_active_trips_overlapping(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        start: NaiveDate,
        end: Option<NaiveDate>,
        exclude_trip_id: Option<Uuid>,
    ) -> AppResult<Vec<Trip>>;

    /// Nombres de recursos alternativos disponibles del mismo tipo,
    /// para las sugerencias del validador.
    async fn list_available_names(
        &self,
        kind: ResourceKind,
        company_id: Uuid,
        exclude_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<String>>;

    /// Abrir la unidad de trabajo para las mutaciones de estado
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;
}

/// Unidad de trabajo del motor. Su única superficie hacia el
/// almacenamiento es la escritura de estado con guarda optimista
/// más begin/commit/rollback.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Escribir el estado de un recurso solo si el estado almacenado
    /// sigue siendo `expected`. Devuelve false si la fila no se
    /// escribió (estado obsoleto: otra petición se interpuso).
    async fn update_resource_status(
        &mut self,
        kind: ResourceKind,
        id: Uuid,
        expected: ResourceStatus,
        new_status: ResourceStatus,
    ) -> AppResult<bool>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Implementación PostgreSQL del Resource Store, compuesta sobre los
/// repositorios de cada entidad.
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        VehicleRepository::new(self.pool.clone()).find_by_id(id).await
    }

    async fn get_trailer(&self, id: Uuid) -> AppResult<Option<Trailer>> {
        TrailerRepository::new(self.pool.clone()).find_by_id(id).await
    }

    async fn get_operator(&self, id: Uuid) -> AppResult<Option<Operator>> {
        OperatorRepository::new(self.pool.clone()).find_by_id(id).await
    }

    async fn find_active_trips_overlapping(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        start: NaiveDate,
        end: Option<NaiveDate>,
        exclude_trip_id: Option<Uuid>,
    ) -> AppResult<Vec<Trip>> {
        TripRepository::new(self.pool.clone())
            .find_active_overlapping(kind, resource_id, start, end, exclude_trip_id)
            .await
    }

    async fn list_available_names(
        &self,
        kind: ResourceKind,
        company_id: Uuid,
        exclude_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<String>> {
        let names = match kind {
            ResourceKind::Vehicle => VehicleRepository::new(self.pool.clone())
                .list_available(company_id, exclude_id, limit)
                .await?
                .into_iter()
                .map(|v| v.license_plate)
                .collect(),
            ResourceKind::Trailer => TrailerRepository::new(self.pool.clone())
                .list_available(company_id, exclude_id, limit)
                .await?
                .into_iter()
                .map(|t| t.code)
                .collect(),
            ResourceKind::Operator => OperatorRepository::new(self.pool.clone())
                .list_active(company_id, exclude_id, limit)
                .await?
                .into_iter()
                .map(|o| o.full_name)
                .collect(),
        };

        Ok(names)
    }

    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }
}

struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn update_resource_status(
        &mut self,
        kind: ResourceKind,
        id: Uuid,
        expected: ResourceStatus,
        new_status: ResourceStatus,
    ) -> AppResult<bool> {
        let table = match kind {
            ResourceKind::Vehicle => "vehicles",
            ResourceKind::Trailer => "trailers",
            ResourceKind::Operator => {
                return Err(AppError::Internal(
                    "los operadores no tienen campo de estado de recurso".to_string(),
                ))
            }
        };

        // Guarda optimista: la fila solo se escribe si nadie cambió el
        // estado desde que lo observó la validación.
        let sql = format!("UPDATE {table} SET status = $2 WHERE id = $1 AND status = $3");
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(new_status)
            .bind(expected)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// Store en memoria para los tests del motor. Mismo contrato que el de
/// PostgreSQL, incluida la guarda optimista y el rollback; permite
/// inyectar una escritura obsoleta para simular una carrera.
#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::models::resource::OperatorStatus;
    use crate::models::trip::TripStatus;

    #[derive(Default)]
    pub(crate) struct MemoryState {
        pub vehicles: HashMap<Uuid, Vehicle>,
        pub trailers: HashMap<Uuid, Trailer>,
        pub operators: HashMap<Uuid, Operator>,
        pub trips: Vec<Trip>,
        /// Simula una escritura obsoleta sobre este recurso
        pub fail_update_for: Option<Uuid>,
    }

    #[derive(Clone, Default)]
    pub(crate) struct MemoryStore {
        state: Arc<Mutex<MemoryState>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_vehicle(&self, vehicle: Vehicle) {
            self.state.lock().unwrap().vehicles.insert(vehicle.id, vehicle);
        }

        pub fn add_trailer(&self, trailer: Trailer) {
            self.state.lock().unwrap().trailers.insert(trailer.id, trailer);
        }

        pub fn add_operator(&self, operator: Operator) {
            self.state.lock().unwrap().operators.insert(operator.id, operator);
        }

        pub fn add_trip(&self, trip: Trip) {
            self.state.lock().unwrap().trips.push(trip);
        }

        pub fn set_trip_status(&self, trip_id: Uuid, status: TripStatus) {
            let mut state = self.state.lock().unwrap();
            if let Some(trip) = state.trips.iter_mut().find(|t| t.id == trip_id) {
                trip.status = status;
            }
        }

        pub fn fail_next_update_for(&self, resource_id: Uuid) {
            self.state.lock().unwrap().fail_update_for = Some(resource_id);
        }

        pub fn vehicle_status(&self, id: Uuid) -> ResourceStatus {
            self.state.lock().unwrap().vehicles[&id].status
        }

        pub fn trailer_status(&self, id: Uuid) -> ResourceStatus {
            self.state.lock().unwrap().trailers[&id].status
        }
    }

    #[async_trait]
    impl ResourceStore for MemoryStore {
        async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
            Ok(self.state.lock().unwrap().vehicles.get(&id).cloned())
        }

        async fn get_trailer(&self, id: Uuid) -> AppResult<Option<Trailer>> {
            Ok(self.state.lock().unwrap().trailers.get(&id).cloned())
        }

        async fn get_operator(&self, id: Uuid) -> AppResult<Option<Operator>> {
            Ok(self.state.lock().unwrap().operators.get(&id).cloned())
        }

        async fn find_active_trips_overlapping(
            &self,
            kind: ResourceKind,
            resource_id: Uuid,
            start: NaiveDate,
            end: Option<NaiveDate>,
            exclude_trip_id: Option<Uuid>,
        ) -> AppResult<Vec<Trip>> {
            let state = self.state.lock().unwrap();
            let mut matches: Vec<Trip> = state
                .trips
                .iter()
                .filter(|t| match kind {
                    ResourceKind::Vehicle => t.truck_id == resource_id,
                    ResourceKind::Trailer => t.trailer_id == Some(resource_id),
                    ResourceKind::Operator => t.operator_id == resource_id,
                })
                .filter(|t| t.status.is_active())
                .filter(|t| Some(t.id) != exclude_trip_id)
                .filter(|t| t.overlaps_interval(start, end))
                .cloned()
                .collect();
            matches.sort_by_key(|t| t.start_date);
            Ok(matches)
        }

        async fn list_available_names(
            &self,
            kind: ResourceKind,
            company_id: Uuid,
            exclude_id: Uuid,
            limit: i64,
        ) -> AppResult<Vec<String>> {
            let state = self.state.lock().unwrap();
            let mut names: Vec<String> = match kind {
                ResourceKind::Vehicle => state
                    .vehicles
                    .values()
                    .filter(|v| {
                        v.company_id == company_id
                            && v.id != exclude_id
                            && v.status == ResourceStatus::Available
                    })
                    .map(|v| v.license_plate.clone())
                    .collect(),
                ResourceKind::Trailer => state
                    .trailers
                    .values()
                    .filter(|t| {
                        t.company_id == company_id
                            && t.id != exclude_id
                            && t.status == ResourceStatus::Available
                    })
                    .map(|t| t.code.clone())
                    .collect(),
                ResourceKind::Operator => state
                    .operators
                    .values()
                    .filter(|o| {
                        o.company_id == company_id
                            && o.id != exclude_id
                            && o.status == OperatorStatus::Active
                    })
                    .map(|o| o.full_name.clone())
                    .collect(),
            };
            names.sort();
            names.truncate(limit as usize);
            Ok(names)
        }

        async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
            Ok(Box::new(MemoryTransaction {
                state: self.state.clone(),
                undo: Vec::new(),
            }))
        }
    }

    struct MemoryTransaction {
        state: Arc<Mutex<MemoryState>>,
        undo: Vec<(ResourceKind, Uuid, ResourceStatus)>,
    }

    impl MemoryTransaction {
        fn status_slot<'a>(
            state: &'a mut MemoryState,
            kind: ResourceKind,
            id: Uuid,
        ) -> Option<&'a mut ResourceStatus> {
            match kind {
                ResourceKind::Vehicle => state.vehicles.get_mut(&id).map(|v| &mut v.status),
                ResourceKind::Trailer => state.trailers.get_mut(&id).map(|t| &mut t.status),
                ResourceKind::Operator => None,
            }
        }
    }

    #[async_trait]
    impl StoreTransaction for MemoryTransaction {
        async fn update_resource_status(
            &mut self,
            kind: ResourceKind,
            id: Uuid,
            expected: ResourceStatus,
            new_status: ResourceStatus,
        ) -> AppResult<bool> {
            let mut state = self.state.lock().unwrap();
            if state.fail_update_for == Some(id) {
                return Ok(false);
            }
            match Self::status_slot(&mut state, kind, id) {
                Some(status) if *status == expected => {
                    *status = new_status;
                    self.undo.push((kind, id, expected));
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn commit(self: Box<Self>) -> AppResult<()> {
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> AppResult<()> {
            let mut state = self.state.lock().unwrap();
            for (kind, id, previous) in self.undo.iter().rev() {
                if let Some(status) = Self::status_slot(&mut state, *kind, *id) {
                    *status = *previous;
                }
            }
            Ok(())
        }
    }

    // ── Builders compartidos por los tests del motor ──

    pub(crate) fn test_vehicle(company_id: Uuid, plate: &str, status: ResourceStatus) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            company_id,
            license_plate: plate.to_string(),
            brand: None,
            model: None,
            status,
            current_mileage: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn test_trailer(company_id: Uuid, code: &str, status: ResourceStatus) -> Trailer {
        Trailer {
            id: Uuid::new_v4(),
            company_id,
            code: code.to_string(),
            trailer_type: None,
            status,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn test_operator(company_id: Uuid, name: &str, status: OperatorStatus) -> Operator {
        Operator {
            id: Uuid::new_v4(),
            company_id,
            full_name: name.to_string(),
            license_number: None,
            status,
            created_at: Utc::now(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn test_trip(
        company_id: Uuid,
        truck_id: Uuid,
        trailer_id: Option<Uuid>,
        operator_id: Uuid,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            company_id,
            truck_id,
            trailer_id,
            operator_id,
            origin: "Madrid".to_string(),
            destination: "Valencia".to_string(),
            start_date: start,
            end_date: end,
            status: TripStatus::Planned,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
