//! DTOs de operadores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::operator::Operator;
use crate::models::resource::OperatorStatus;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOperatorRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(length(min = 3, max = 30))]
    pub license_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOperatorRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,

    #[validate(length(min = 3, max = 30))]
    pub license_number: Option<String>,
}

/// El estado del operador es administrativo (active/inactive/suspended);
/// no pasa por la máquina de estados de vehículos y remolques
#[derive(Debug, Deserialize)]
pub struct UpdateOperatorStatusRequest {
    pub status: OperatorStatus,
}

#[derive(Debug, Serialize)]
pub struct OperatorResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub full_name: String,
    pub license_number: Option<String>,
    pub status: OperatorStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Operator> for OperatorResponse {
    fn from(operator: Operator) -> Self {
        Self {
            id: operator.id,
            company_id: operator.company_id,
            full_name: operator.full_name,
            license_number: operator.license_number,
            status: operator.status,
            created_at: operator.created_at,
        }
    }
}
