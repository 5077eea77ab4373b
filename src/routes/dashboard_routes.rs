use axum::{extract::State, middleware, routing::get, Extension, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::DashboardSummary;
use crate::middleware::auth::{auth_middleware, ActingUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn summary(
    Extension(user): Extension<ActingUser>,
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let response = controller.summary(&user).await?;
    Ok(Json(response))
}
