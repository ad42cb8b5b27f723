use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::availability_controller::AvailabilityController;
use crate::dto::availability_dto::AvailabilityQuery;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::availability_service::ValidationResult;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Chequeo de disponibilidad en vivo para los formularios de viaje.
/// El resultado siempre es 200 con el detalle estructurado; los errores
/// HTTP quedan para recursos inexistentes o de otra empresa.
pub fn create_availability_router() -> Router<AppState> {
    Router::new()
        .route("/vehicle/:id", get(check_vehicle))
        .route("/trailer/:id", get(check_trailer))
        .route("/operator/:id", get(check_operator))
}

async fn check_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ValidationResult>, AppError> {
    let controller = AvailabilityController::new(state.pool.clone());
    let result = controller.check_vehicle(id, auth.company_id, query).await?;
    Ok(Json(result))
}

async fn check_trailer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ValidationResult>, AppError> {
    let controller = AvailabilityController::new(state.pool.clone());
    let result = controller.check_trailer(id, auth.company_id, query).await?;
    Ok(Json(result))
}

async fn check_operator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ValidationResult>, AppError> {
    let controller = AvailabilityController::new(state.pool.clone());
    let result = controller.check_operator(id, auth.company_id, query).await?;
    Ok(Json(result))
}
