mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::cors::cors_middleware;
use middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Recon Tracker - Pipeline de reacondicionamiento");
    info!("==================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let rate_limit_state = RateLimitState::new(&config);
    let app_state = AppState::new(pool, config.clone());

    // Crear router de la API
    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest(
            "/api/auth",
            routes::auth_routes::create_auth_router(rate_limit_state.clone()),
        )
        .nest(
            "/api/vehicle",
            routes::vehicle_routes::create_vehicle_router(app_state.clone()),
        )
        .nest(
            "/api/dashboard",
            routes::dashboard_routes::create_dashboard_router(app_state.clone()),
        )
        .nest(
            "/api/admin",
            routes::admin_routes::create_admin_router(app_state.clone()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_middleware()),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit_middleware,
        ))
        .with_state(app_state);

    // Puerto del servidor
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Autenticación:");
    info!("   POST /api/auth/login - Login por PIN");
    info!("🚙 Vehículos:");
    info!("   POST /api/vehicle - Alta de vehículo (con VIN decode)");
    info!("   GET  /api/vehicle - Listar con estado derivado");
    info!("   GET  /api/vehicle/:id - Detalle con completados");
    info!("   PUT  /api/vehicle/:id - Actualizar campos descriptivos");
    info!("   POST /api/vehicle/:id/archive - Archivar (soft delete)");
    info!("   POST /api/vehicle/:id/restore - Restaurar");
    info!("   GET  /api/vehicle/:id/completions - Completados del vehículo");
    info!("   PUT  /api/vehicle/:id/stage/:stage_id - Completar/limpiar etapa");
    info!("📊 Dashboard:");
    info!("   GET  /api/dashboard/summary - SLA, métricas por etapa, aging");
    info!("🔧 Administración (solo Manager):");
    info!("   GET/POST /api/admin/users - Usuarios");
    info!("   PUT  /api/admin/users/:id - Actualizar usuario");
    info!("   POST /api/admin/users/:id/active - Activar/desactivar");
    info!("   GET/POST /api/admin/stages - Etapas del pipeline");
    info!("   PUT/DELETE /api/admin/stages/:id - Editar/borrar etapa");
    info!("   GET/POST /api/admin/dropdowns - Listas desplegables");
    info!("   PUT/DELETE /api/admin/dropdowns/:id - Editar/borrar lista");
    info!("   GET  /api/admin/audit - Audit log reciente");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "recon-tracker",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
