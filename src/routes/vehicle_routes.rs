use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::completion_controller::CompletionController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::completion_dto::{ApplyCompletionRequest, CompletionUpdateResponse};
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleDetailResponse, VehicleFilters,
    VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, ActingUser};
use crate::models::completion::StageCompletion;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle).get(list_vehicles))
        .route("/:id", get(get_vehicle).put(update_vehicle))
        .route("/:id/archive", post(archive_vehicle))
        .route("/:id/restore", post(restore_vehicle))
        .route("/:id/completions", get(list_completions))
        .route("/:id/stage/:stage_id", put(apply_completion))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_vehicle(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller =
        VehicleController::new(state.pool.clone(), state.vin_decoder.clone(), state.audit.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller =
        VehicleController::new(state.pool.clone(), state.vin_decoder.clone(), state.audit.clone());
    let response = controller
        .list(&user, filters.include_archived.unwrap_or(false))
        .await?;
    Ok(Json(response))
}

async fn get_vehicle(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleDetailResponse>, AppError> {
    let controller =
        VehicleController::new(state.pool.clone(), state.vin_decoder.clone(), state.audit.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller =
        VehicleController::new(state.pool.clone(), state.vin_decoder.clone(), state.audit.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn archive_vehicle(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller =
        VehicleController::new(state.pool.clone(), state.vin_decoder.clone(), state.audit.clone());
    let response = controller.set_archived(&user, id, true).await?;
    Ok(Json(response))
}

async fn restore_vehicle(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller =
        VehicleController::new(state.pool.clone(), state.vin_decoder.clone(), state.audit.clone());
    let response = controller.set_archived(&user, id, false).await?;
    Ok(Json(response))
}

async fn list_completions(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StageCompletion>>, AppError> {
    let controller = CompletionController::new(state.pool.clone(), state.audit.clone());
    let response = controller.list_for_vehicle(&user, id).await?;
    Ok(Json(response))
}

async fn apply_completion(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ApplyCompletionRequest>,
) -> Result<Json<ApiResponse<CompletionUpdateResponse>>, AppError> {
    let controller = CompletionController::new(state.pool.clone(), state.audit.clone());
    let response = controller.apply(&user, id, stage_id, request).await?;
    Ok(Json(response))
}
