use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::trip_controller::TripController;
use crate::dto::api_response::ApiResponse;
use crate::dto::trip_dto::{AssignTripResponse, CreateTripRequest, TripResponse, UpdateTripRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip))
        .route("/", get(list_trips))
        .route("/:id", get(get_trip))
        .route("/:id", put(update_trip))
        .route("/:id", delete(delete_trip))
        .route("/:id/start", post(start_trip))
        .route("/:id/complete", post(complete_trip))
        .route("/:id/cancel", post(cancel_trip))
}

/// Crear un viaje reservando sus recursos. Un rechazo de validación no
/// es error HTTP: vuelve como success=false con errores, advertencias
/// y sugerencias para el formulario.
async fn create_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTripRequest>,
) -> Result<Json<AssignTripResponse>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller
        .create(auth.company_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

async fn get_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<TripResponse>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.get_by_id(id, auth.company_id).await?;
    Ok(Json(response))
}

async fn list_trips(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.list_by_company(auth.company_id).await?;
    Ok(Json(response))
}

async fn update_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTripRequest>,
) -> Result<Json<AssignTripResponse>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller
        .update(id, auth.company_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

async fn start_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.start(id, auth.company_id).await?;
    Ok(Json(response))
}

async fn complete_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller
        .complete(id, auth.company_id, auth.user_id)
        .await?;
    Ok(Json(response))
}

async fn cancel_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller
        .cancel(id, auth.company_id, auth.user_id)
        .await?;
    Ok(Json(response))
}

async fn delete_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = TripController::new(state.pool.clone());
    controller.delete(id, auth.company_id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
