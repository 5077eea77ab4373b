use serde::Deserialize;
use validator::Validate;

use crate::models::dealership::Dealership;
use crate::models::user::UserResponse;

// Request de login por PIN
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "crate::utils::validation::validate_pin")]
    pub pin: String,
}

// Response de login: el usuario y su concesionario
#[derive(Debug, serde::Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub dealership: Option<Dealership>,
}
