use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::admin_controller::AdminController;
use crate::dto::admin_dto::{
    CreateDropdownRequest, CreateStageRequest, CreateUserRequest, SetActiveRequest,
    UpdateDropdownRequest, UpdateStageRequest, UpdateUserRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, manager_only_middleware, ActingUser};
use crate::models::audit::AuditEntry;
use crate::models::dropdown::DropdownList;
use crate::models::stage::PipelineStage;
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Router de administración: solo usuarios con rol Manager
pub fn create_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user))
        .route("/users/:id/active", post(set_user_active))
        .route("/stages", get(list_stages).post(create_stage))
        .route("/stages/:id", put(update_stage).delete(delete_stage))
        .route("/dropdowns", get(list_dropdowns).post(create_dropdown))
        .route("/dropdowns/:id", put(update_dropdown).delete(delete_dropdown))
        .route("/audit", get(recent_audit))
        .route_layer(middleware::from_fn(manager_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

// ---------------------------------------------------------------------------
// Usuarios
// ---------------------------------------------------------------------------

async fn list_users(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.list_users(&user).await?))
}

async fn create_user(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.create_user(&user, request).await?))
}

async fn update_user(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.update_user(&user, id, request).await?))
}

async fn set_user_active(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(
        controller.set_user_active(&user, id, request.active).await?,
    ))
}

// ---------------------------------------------------------------------------
// Etapas del pipeline
// ---------------------------------------------------------------------------

async fn list_stages(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PipelineStage>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.list_stages(&user).await?))
}

async fn create_stage(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateStageRequest>,
) -> Result<Json<ApiResponse<PipelineStage>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.create_stage(&user, request).await?))
}

async fn update_stage(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStageRequest>,
) -> Result<Json<ApiResponse<PipelineStage>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.update_stage(&user, id, request).await?))
}

async fn delete_stage(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = AdminController::new(state.pool.clone());
    controller.delete_stage(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Listas desplegables
// ---------------------------------------------------------------------------

async fn list_dropdowns(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<DropdownList>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.list_dropdowns(&user).await?))
}

async fn create_dropdown(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateDropdownRequest>,
) -> Result<Json<ApiResponse<DropdownList>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.create_dropdown(&user, request).await?))
}

async fn update_dropdown(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDropdownRequest>,
) -> Result<Json<ApiResponse<DropdownList>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.update_dropdown(&user, id, request).await?))
}

async fn delete_dropdown(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = AdminController::new(state.pool.clone());
    controller.delete_dropdown(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AuditQuery {
    limit: Option<i64>,
}

async fn recent_audit(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(
        controller
            .recent_audit(&user, query.limit.unwrap_or(100))
            .await?,
    ))
}
