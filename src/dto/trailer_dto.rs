//! DTOs de remolques

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::resource::ResourceStatus;
use crate::models::trailer::Trailer;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTrailerRequest {
    #[validate(length(min = 3, max = 20))]
    pub code: String,

    #[validate(length(min = 2, max = 50))]
    pub trailer_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTrailerRequest {
    #[validate(length(min = 3, max = 20))]
    pub code: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub trailer_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrailerResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub code: String,
    pub trailer_type: Option<String>,
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Trailer> for TrailerResponse {
    fn from(trailer: Trailer) -> Self {
        Self {
            id: trailer.id,
            company_id: trailer.company_id,
            code: trailer.code,
            trailer_type: trailer.trailer_type,
            status: trailer.status,
            created_at: trailer.created_at,
        }
    }
}
