use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::trailer_controller::TrailerController;
use crate::dto::api_response::ApiResponse;
use crate::dto::trailer_dto::{CreateTrailerRequest, TrailerResponse, UpdateTrailerRequest};
use crate::dto::vehicle_dto::UpdateResourceStatusRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trailer_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trailer))
        .route("/", get(list_trailers))
        .route("/:id", get(get_trailer))
        .route("/:id", put(update_trailer))
        .route("/:id", delete(delete_trailer))
        .route("/:id/status", patch(update_trailer_status))
}

async fn create_trailer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTrailerRequest>,
) -> Result<Json<ApiResponse<TrailerResponse>>, AppError> {
    let controller = TrailerController::new(state.pool.clone());
    let response = controller.create(auth.company_id, request).await?;
    Ok(Json(response))
}

async fn get_trailer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrailerResponse>, AppError> {
    let controller = TrailerController::new(state.pool.clone());
    let response = controller.get_by_id(id, auth.company_id).await?;
    Ok(Json(response))
}

async fn list_trailers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TrailerResponse>>, AppError> {
    let controller = TrailerController::new(state.pool.clone());
    let response = controller.list_by_company(auth.company_id).await?;
    Ok(Json(response))
}

async fn update_trailer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTrailerRequest>,
) -> Result<Json<ApiResponse<TrailerResponse>>, AppError> {
    let controller = TrailerController::new(state.pool.clone());
    let response = controller.update(id, auth.company_id, request).await?;
    Ok(Json(response))
}

async fn update_trailer_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateResourceStatusRequest>,
) -> Result<Json<ApiResponse<TrailerResponse>>, AppError> {
    let controller = TrailerController::new(state.pool.clone());
    let response = controller
        .update_status(id, auth.company_id, request.status)
        .await?;
    Ok(Json(response))
}

async fn delete_trailer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = TrailerController::new(state.pool.clone());
    controller.delete(id, auth.company_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
