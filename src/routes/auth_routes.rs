use axum::{extract::State, middleware, routing::post, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::middleware::rate_limit::{strict_rate_limit_middleware, RateLimitState};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Router de autenticación. El login por PIN lleva rate limiting
/// estricto: la credencial es corta y adivinable por fuerza bruta.
pub fn create_auth_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(
            rate_limit,
            strict_rate_limit_middleware,
        ))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}
