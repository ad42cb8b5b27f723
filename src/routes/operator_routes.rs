use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::operator_controller::OperatorController;
use crate::dto::api_response::ApiResponse;
use crate::dto::operator_dto::{
    CreateOperatorRequest, OperatorResponse, UpdateOperatorRequest, UpdateOperatorStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_operator_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_operator))
        .route("/", get(list_operators))
        .route("/:id", get(get_operator))
        .route("/:id", put(update_operator))
        .route("/:id", delete(delete_operator))
        .route("/:id/status", patch(update_operator_status))
}

async fn create_operator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<CreateOperatorRequest>,
) -> Result<Json<ApiResponse<OperatorResponse>>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    let response = controller.create(auth.company_id, request).await?;
    Ok(Json(response))
}

async fn get_operator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<OperatorResponse>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    let response = controller.get_by_id(id, auth.company_id).await?;
    Ok(Json(response))
}

async fn list_operators(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<OperatorResponse>>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    let response = controller.list_by_company(auth.company_id).await?;
    Ok(Json(response))
}

async fn update_operator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOperatorRequest>,
) -> Result<Json<ApiResponse<OperatorResponse>>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    let response = controller.update(id, auth.company_id, request).await?;
    Ok(Json(response))
}

async fn update_operator_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOperatorStatusRequest>,
) -> Result<Json<ApiResponse<OperatorResponse>>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    let response = controller
        .update_status(id, auth.company_id, request.status)
        .await?;
    Ok(Json(response))
}

async fn delete_operator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    controller.delete(id, auth.company_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
