//! Services module
//!
//! Este módulo contiene el motor de asignación de recursos: el Resource
//! Store (frontera con el almacenamiento), el detector de solapes, el
//! validador de disponibilidad, la máquina de estados y el coordinador
//! de asignación.

pub mod assignment_service;
pub mod availability_service;
pub mod overlap_service;
pub mod resource_store;
pub mod status_service;

pub use assignment_service::{AssignmentResult, AssignmentService, ReleaseResult};
pub use availability_service::{AvailabilityService, ValidationResult};
pub use overlap_service::OverlapService;
pub use resource_store::{PgResourceStore, ResourceStore, StoreTransaction};
pub use status_service::StatusService;
