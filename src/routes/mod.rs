pub mod admin_routes;
pub mod auth_routes;
pub mod dashboard_routes;
pub mod vehicle_routes;
