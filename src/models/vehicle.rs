//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle que mapea exactamente a la
//! tabla vehicles, con primary key 'id' y estado del ENUM resource_status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::resource::{Assignable, ResourceKind, ResourceStatus};

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub company_id: Uuid,
    pub license_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub status: ResourceStatus,
    pub current_mileage: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Assignable for Vehicle {
    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Uuid {
        self.company_id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Vehicle
    }

    fn display_name(&self) -> String {
        self.license_plate.clone()
    }

    fn passes_status_gate(&self) -> bool {
        self.status == ResourceStatus::Available
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }
}
