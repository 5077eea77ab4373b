//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación:
//! el motor puro de estado del pipeline, el filtro de acceso por rol,
//! el audit sink y la decodificación de VIN.

pub mod access;
pub mod audit_service;
pub mod pipeline_engine;
pub mod vin_service;

pub use audit_service::{AuditSink, PgAuditSink};
pub use vin_service::VinDecoder;
