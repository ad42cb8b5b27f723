//! DTOs de viajes

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::trip::{Trip, TripStatus};
use crate::services::assignment_service::AssignmentResult;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    pub truck_id: Uuid,
    pub trailer_id: Option<Uuid>,
    pub operator_id: Uuid,

    #[validate(length(min = 2, max = 200))]
    pub origin: String,

    #[validate(length(min = 2, max = 200))]
    pub destination: String,

    pub start_date: NaiveDate,
    /// Fin inclusivo; ausente = viaje abierto
    pub end_date: Option<NaiveDate>,
}

/// Reasignación de un viaje planificado (flujo de edición)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTripRequest {
    pub truck_id: Option<Uuid>,
    pub trailer_id: Option<Option<Uuid>>,
    pub operator_id: Option<Uuid>,

    #[validate(length(min = 2, max = 200))]
    pub origin: Option<String>,

    #[validate(length(min = 2, max = 200))]
    pub destination: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub truck_id: Uuid,
    pub trailer_id: Option<Uuid>,
    pub operator_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            company_id: trip.company_id,
            truck_id: trip.truck_id,
            trailer_id: trip.trailer_id,
            operator_id: trip.operator_id,
            origin: trip.origin,
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            status: trip.status,
            created_at: trip.created_at,
        }
    }
}

/// Resultado de crear o reasignar un viaje: el viaje solo viene cuando
/// la asignación de recursos tuvo éxito; errores, advertencias y
/// sugerencias vienen siempre para que el formulario las muestre.
#[derive(Debug, Serialize)]
pub struct AssignTripResponse {
    pub success: bool,
    pub trip: Option<TripResponse>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AssignTripResponse {
    pub fn assigned(trip: Trip, result: AssignmentResult) -> Self {
        Self {
            success: true,
            trip: Some(trip.into()),
            errors: result.errors,
            warnings: result.warnings,
            suggestions: result.suggestions,
        }
    }

    pub fn rejected(result: AssignmentResult) -> Self {
        Self {
            success: false,
            trip: None,
            errors: result.errors,
            warnings: result.warnings,
            suggestions: result.suggestions,
        }
    }
}
