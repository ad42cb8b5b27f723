//! Validador de disponibilidad
//!
//! Combina la puerta de estado del recurso con el detector de solapes
//! para decidir si un recurso es asignable, acumulando errores,
//! advertencias y sugerencias en un resultado estructurado. Nunca lanza
//! por una indisponibilidad ordinaria: eso es dato, no excepción.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::operator::Operator;
use crate::models::resource::Assignable;
use crate::models::trailer::Trailer;
use crate::models::vehicle::Vehicle;
use crate::services::overlap_service::OverlapService;
use crate::services::resource_store::ResourceStore;
use crate::utils::errors::AppResult;

/// Máximo de alternativas sugeridas por recurso
const SUGGESTION_LIMIT: i64 = 5;

/// Resultado de validación de un recurso. Los errores bloquean la
/// asignación; advertencias y sugerencias son informativas y el
/// llamador nunca debe tratarlas como fallo.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            ..Default::default()
        }
    }

    pub fn add_error(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }

    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    pub fn add_suggestion(&mut self, message: String) {
        self.suggestions.push(message);
    }

    /// Acumular otro resultado sobre este
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.suggestions.extend(other.suggestions);
    }
}

pub struct AvailabilityService {
    store: Arc<dyn ResourceStore>,
    overlap: OverlapService,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            overlap: OverlapService::new(store.clone()),
            store,
        }
    }

    pub async fn check_vehicle(
        &self,
        vehicle: &Vehicle,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        exclude_trip_id: Option<Uuid>,
    ) -> AppResult<ValidationResult> {
        self.check_resource(vehicle, start, end, exclude_trip_id).await
    }

    pub async fn check_trailer(
        &self,
        trailer: &Trailer,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        exclude_trip_id: Option<Uuid>,
    ) -> AppResult<ValidationResult> {
        self.check_resource(trailer, start, end, exclude_trip_id).await
    }

    pub async fn check_operator(
        &self,
        operator: &Operator,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        exclude_trip_id: Option<Uuid>,
    ) -> AppResult<ValidationResult> {
        self.check_resource(operator, start, end, exclude_trip_id).await
    }

    /// Validación común a los tres tipos de recurso.
    ///
    /// 1. Puerta de estado: siempre corre, no depende de fechas.
    /// 2. Puerta de intervalo: corre si hay fecha de inicio; un fin
    ///    ausente se trata como no acotado. Sin fecha de inicio la
    ///    validación por fechas se omite (es oportunista).
    /// 3. Sugerencias: solo si ambas puertas pasaron; nunca cambian
    ///    `is_valid`.
    async fn check_resource(
        &self,
        resource: &dyn Assignable,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        exclude_trip_id: Option<Uuid>,
    ) -> AppResult<ValidationResult> {
        let mut result = ValidationResult::valid();
        let kind = resource.kind();

        // Puerta de estado
        if !resource.passes_status_gate() {
            result.add_error(format!(
                "El {} '{}' no está disponible (estado actual: {})",
                kind.label(),
                resource.display_name(),
                resource.status_label(),
            ));
        }

        // Puerta de intervalo
        if let Some(start) = start {
            let conflicts = self
                .overlap
                .find_overlapping(kind, resource.resource_id(), start, end, exclude_trip_id)
                .await?;

            for trip in &conflicts {
                result.add_error(format!(
                    "El {} '{}' ya está asignado a otro viaje en el intervalo {}",
                    kind.label(),
                    resource.display_name(),
                    trip.interval_label(),
                ));
                result.add_warning(format!("Viaje en conflicto: {}", trip.route_label()));
            }
        }

        // Sugerencias de recursos alternativos
        if result.is_valid {
            let alternatives = self
                .store
                .list_available_names(
                    kind,
                    resource.company_id(),
                    resource.resource_id(),
                    SUGGESTION_LIMIT,
                )
                .await?;
            for name in alternatives {
                result.add_suggestion(format!("{} alternativo disponible: {}", kind.label(), name));
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resource::{OperatorStatus, ResourceStatus};
    use crate::services::resource_store::memory::*;

    fn service(store: &MemoryStore) -> AvailabilityService {
        AvailabilityService::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_puerta_de_estado_precede_a_las_fechas() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let vehicle = test_vehicle(company, "AB-123-CD", ResourceStatus::Maintenance);
        store.add_vehicle(vehicle.clone());

        // Sin ningún solape de fechas, el estado maintenance ya bloquea
        let result = service(&store)
            .check_vehicle(&vehicle, Some(date(2024, 3, 1)), Some(date(2024, 3, 5)), None)
            .await
            .unwrap();

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("maintenance"));
    }

    #[tokio::test]
    async fn test_sin_fechas_solo_cuenta_el_estado() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let vehicle = test_vehicle(company, "AB-123-CD", ResourceStatus::Available);
        let operator = test_operator(company, "Ana Pérez", OperatorStatus::Active);

        // Hay un viaje activo que solaparía, pero sin fechas la puerta
        // de intervalo se omite
        store.add_trip(test_trip(
            company,
            vehicle.id,
            None,
            operator.id,
            date(2024, 3, 1),
            Some(date(2024, 3, 10)),
        ));
        store.add_vehicle(vehicle.clone());
        store.add_operator(operator);

        let result = service(&store)
            .check_vehicle(&vehicle, None, None, None)
            .await
            .unwrap();

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_conflicto_genera_error_y_advertencia() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let vehicle = test_vehicle(company, "AB-123-CD", ResourceStatus::Available);
        let operator = test_operator(company, "Ana Pérez", OperatorStatus::Active);

        store.add_trip(test_trip(
            company,
            vehicle.id,
            None,
            operator.id,
            date(2024, 3, 1),
            Some(date(2024, 3, 10)),
        ));
        store.add_vehicle(vehicle.clone());
        store.add_operator(operator);

        let result = service(&store)
            .check_vehicle(&vehicle, Some(date(2024, 3, 5)), Some(date(2024, 3, 7)), None)
            .await
            .unwrap();

        assert!(!result.is_valid);
        // El error cita el intervalo del viaje en conflicto
        assert!(result.errors[0].contains("2024-03-01 - 2024-03-10"));
        // La advertencia orienta con origen y destino
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Madrid -> Valencia"));
    }

    #[tokio::test]
    async fn test_operador_suspendido_bloquea() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let operator = test_operator(company, "Ana Pérez", OperatorStatus::Suspended);
        store.add_operator(operator.clone());

        let result = service(&store)
            .check_operator(&operator, None, None, None)
            .await
            .unwrap();

        assert!(!result.is_valid);
        assert!(result.errors[0].contains("suspended"));
    }

    #[tokio::test]
    async fn test_sugerencias_solo_al_pasar_ambas_puertas() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let vehicle = test_vehicle(company, "AB-123-CD", ResourceStatus::Available);
        let other = test_vehicle(company, "ZZ-999-XX", ResourceStatus::Available);
        let busy = test_vehicle(company, "MM-555-NN", ResourceStatus::Maintenance);
        store.add_vehicle(vehicle.clone());
        store.add_vehicle(other);
        store.add_vehicle(busy);

        let result = service(&store)
            .check_vehicle(&vehicle, Some(date(2024, 3, 1)), Some(date(2024, 3, 5)), None)
            .await
            .unwrap();

        assert!(result.is_valid);
        // Solo el alternativo disponible aparece; el de maintenance no
        assert_eq!(result.suggestions.len(), 1);
        assert!(result.suggestions[0].contains("ZZ-999-XX"));

        // Un recurso que falla la puerta de estado no acumula sugerencias
        let failing = test_vehicle(company, "QQ-111-QQ", ResourceStatus::OutOfService);
        store.add_vehicle(failing.clone());
        let result = service(&store)
            .check_vehicle(&failing, None, None, None)
            .await
            .unwrap();
        assert!(!result.is_valid);
        assert!(result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_merge_acumula_sin_cortocircuito() {
        let mut total = ValidationResult::valid();
        let mut fallo = ValidationResult::valid();
        fallo.add_error("error uno".to_string());
        fallo.add_warning("aviso uno".to_string());

        total.merge(fallo);
        let mut otro = ValidationResult::valid();
        otro.add_suggestion("sugerencia".to_string());
        total.merge(otro);

        assert!(!total.is_valid);
        assert_eq!(total.errors.len(), 1);
        assert_eq!(total.warnings.len(), 1);
        assert_eq!(total.suggestions.len(), 1);
    }
}
