//! Modelo de Operator
//!
//! Mapea a la tabla operators. Un operador no tiene campo ocupado/libre:
//! su disponibilidad por fechas se deriva del solape con viajes activos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::resource::{Assignable, OperatorStatus, ResourceKind};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Operator {
    pub id: Uuid,
    pub company_id: Uuid,
    pub full_name: String,
    pub license_number: Option<String>,
    pub status: OperatorStatus,
    pub created_at: DateTime<Utc>,
}

impl Assignable for Operator {
    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Uuid {
        self.company_id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Operator
    }

    fn display_name(&self) -> String {
        self.full_name.clone()
    }

    fn passes_status_gate(&self) -> bool {
        self.status == OperatorStatus::Active
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }
}
