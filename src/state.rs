//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: pool de Postgres, configuración, el
//! decodificador de VIN con su cache inyectado y el audit sink.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::audit_service::{AuditSink, PgAuditSink};
use crate::services::vin_service::VinDecoder;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub vin_decoder: VinDecoder,
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let vin_decoder = VinDecoder::new(config.vpic_base_url.clone());
        let audit: Arc<dyn AuditSink> = Arc::new(PgAuditSink::new(pool.clone()));

        Self {
            pool,
            config,
            vin_decoder,
            audit,
        }
    }
}
