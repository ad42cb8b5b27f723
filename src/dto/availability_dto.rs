//! DTOs de consultas de disponibilidad

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

/// Query del chequeo de disponibilidad en vivo desde el formulario.
/// Las fechas son opcionales: sin fecha de inicio solo se valida el
/// estado del recurso.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Viaje a excluir al revalidar en el flujo de edición
    pub exclude_trip_id: Option<Uuid>,
}
