//! Modelo de Trip
//!
//! Este módulo contiene el struct Trip, su ciclo de vida y la comparación
//! de intervalos de fechas que usa el detector de solapes. Las fechas son
//! de calendario e inclusivas por ambos extremos; un fin nulo significa
//! viaje abierto (activo hasta que se cierre explícitamente).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del viaje - mapea al ENUM trip_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "trip_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planned => "planned",
            TripStatus::InProgress => "in_progress",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    /// Un viaje activo retiene sus recursos
    pub fn is_active(&self) -> bool {
        matches!(self, TripStatus::Planned | TripStatus::InProgress)
    }
}

/// Trip principal - mapea exactamente a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
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
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Dos intervalos cerrados [s1,e1] y [s2,e2] se solapan si
/// `s1 <= e2 && s2 <= e1`. Un fin nulo es no acotado por ese lado:
/// solapa con cualquier intervalo que termine en o después de su inicio.
pub fn intervals_overlap(
    s1: NaiveDate,
    e1: Option<NaiveDate>,
    s2: NaiveDate,
    e2: Option<NaiveDate>,
) -> bool {
    let first_starts_in_time = match e2 {
        Some(e2) => s1 <= e2,
        None => true,
    };
    let second_starts_in_time = match e1 {
        Some(e1) => s2 <= e1,
        None => true,
    };
    first_starts_in_time && second_starts_in_time
}

impl Trip {
    /// ¿El intervalo de este viaje intersecta el intervalo pedido?
    pub fn overlaps_interval(&self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        intervals_overlap(self.start_date, self.end_date, start, end)
    }

    /// Intervalo del viaje para citarlo en mensajes de error
    pub fn interval_label(&self) -> String {
        match self.end_date {
            Some(end) => format!("{} - {}", self.start_date, end),
            None => format!("{} - (sin fecha de fin)", self.start_date),
        }
    }

    /// Origen y destino para orientar al operador
    pub fn route_label(&self) -> String {
        format!("{} -> {}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overlap_basico() {
        // Solape parcial
        assert!(intervals_overlap(
            date(2024, 1, 1),
            Some(date(2024, 1, 10)),
            date(2024, 1, 5),
            Some(date(2024, 1, 15)),
        ));
        // Contenido por completo
        assert!(intervals_overlap(
            date(2024, 1, 1),
            Some(date(2024, 1, 31)),
            date(2024, 1, 10),
            Some(date(2024, 1, 12)),
        ));
        // Disjuntos
        assert!(!intervals_overlap(
            date(2024, 1, 1),
            Some(date(2024, 1, 5)),
            date(2024, 1, 7),
            Some(date(2024, 1, 10)),
        ));
    }

    #[test]
    fn test_overlap_frontera_inclusiva() {
        // T1.end == T2.start cuenta como conflicto (fechas inclusivas)
        assert!(intervals_overlap(
            date(2024, 1, 1),
            Some(date(2024, 1, 5)),
            date(2024, 1, 5),
            Some(date(2024, 1, 10)),
        ));
        // Un día de separación ya no
        assert!(!intervals_overlap(
            date(2024, 1, 1),
            Some(date(2024, 1, 5)),
            date(2024, 1, 6),
            Some(date(2024, 1, 10)),
        ));
    }

    #[test]
    fn test_overlap_fin_abierto() {
        // Un viaje sin fecha de fin conflicta con todo lo que empiece después
        assert!(intervals_overlap(
            date(2024, 1, 1),
            None,
            date(2025, 6, 1),
            Some(date(2025, 6, 10)),
        ));
        // Pero no con intervalos que terminan antes de su inicio
        assert!(!intervals_overlap(
            date(2024, 6, 1),
            None,
            date(2024, 1, 1),
            Some(date(2024, 5, 31)),
        ));
        // Dos abiertos siempre se solapan
        assert!(intervals_overlap(date(2024, 1, 1), None, date(2030, 1, 1), None));
    }

    #[test]
    fn test_trip_status_activo() {
        assert!(TripStatus::Planned.is_active());
        assert!(TripStatus::InProgress.is_active());
        assert!(!TripStatus::Completed.is_active());
        assert!(!TripStatus::Cancelled.is_active());
    }
}
