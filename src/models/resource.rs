//! Recursos asignables de la flota
//!
//! Este módulo define los tipos comunes a los tres recursos que un viaje
//! puede reservar (vehículo, remolque, operador): el tipo de recurso, los
//! enums de estado que mapean a los ENUMs de PostgreSQL y el trait
//! `Assignable` que comparten las tres entidades.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

/// Tipo de recurso que participa en una asignación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vehicle,
    Trailer,
    Operator,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Vehicle => "vehicle",
            ResourceKind::Trailer => "trailer",
            ResourceKind::Operator => "operator",
        }
    }

    /// Etiqueta para mensajes de cara al usuario
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Vehicle => "vehículo",
            ResourceKind::Trailer => "remolque",
            ResourceKind::Operator => "operador",
        }
    }
}

/// Estado de vehículos y remolques - mapea al ENUM resource_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "resource_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    Available,
    InTrip,
    Maintenance,
    OutOfService,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Available => "available",
            ResourceStatus::InTrip => "in_trip",
            ResourceStatus::Maintenance => "maintenance",
            ResourceStatus::OutOfService => "out_of_service",
        }
    }

    /// Tabla de transiciones permitidas.
    ///
    /// `in_trip` solo se alcanza desde `available` y solo se abandona
    /// liberando el recurso; `out_of_service` no vuelve directo a
    /// `available` (pasa por maintenance). Toda transición no listada
    /// se deniega, nunca se fuerza.
    pub fn can_transition(self, to: ResourceStatus) -> bool {
        use ResourceStatus::*;
        match (self, to) {
            (Available, InTrip) => true,
            (Available, Maintenance) => true,
            (Available, OutOfService) => true,
            (InTrip, Available) => true,
            (Maintenance, Available) => true,
            (Maintenance, OutOfService) => true,
            (OutOfService, Maintenance) => true,
            _ => false,
        }
    }
}

/// Estado de operadores - mapea al ENUM operator_status
///
/// Los operadores no tienen máquina de estados: su "ocupado" se deriva
/// del solape con viajes activos, no de un campo almacenado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "operator_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperatorStatus {
    Active,
    Inactive,
    Suspended,
}

impl OperatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorStatus::Active => "active",
            OperatorStatus::Inactive => "inactive",
            OperatorStatus::Suspended => "suspended",
        }
    }
}

/// Capacidad común de los recursos reservables por un viaje.
///
/// El motor de asignación trabaja contra este trait en lugar de
/// ramificar por tipo de entidad en cada punto de uso.
pub trait Assignable: Send + Sync {
    fn resource_id(&self) -> Uuid;
    fn company_id(&self) -> Uuid;
    fn kind(&self) -> ResourceKind;

    /// Nombre para diagnósticos y mensajes (matrícula, código, nombre)
    fn display_name(&self) -> String;

    /// Puerta de estado: ¿el estado almacenado permite asignar ahora?
    /// No consulta fechas; eso es la puerta de intervalo.
    fn passes_status_gate(&self) -> bool;

    /// Etiqueta del estado actual para citarla en errores
    fn status_label(&self) -> &'static str;
}
