//! Controllers
//!
//! Reglas de negocio por recurso: validación, control de acceso por rol
//! y orquestación entre repositorios, motor de pipeline y audit sink.

pub mod admin_controller;
pub mod auth_controller;
pub mod completion_controller;
pub mod dashboard_controller;
pub mod vehicle_controller;
