//! Modelo de Trailer
//!
//! Mapea a la tabla trailers. Los remolques comparten el ENUM
//! resource_status con los vehículos y la misma máquina de estados.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::resource::{Assignable, ResourceKind, ResourceStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trailer {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Código o matrícula del remolque
    pub code: String,
    pub trailer_type: Option<String>,
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
}

impl Assignable for Trailer {
    fn resource_id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Uuid {
        self.company_id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Trailer
    }

    fn display_name(&self) -> String {
        self.code.clone()
    }

    fn passes_status_gate(&self) -> bool {
        self.status == ResourceStatus::Available
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }
}
